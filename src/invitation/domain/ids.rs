//! Identifier and validated scalar types for the invitation domain.

use super::InvitationDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque referral code that identifies an invitation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvitationCode(String);

impl InvitationCode {
    /// Longest code representable in the current `PostgreSQL` schema.
    pub const MAX_LENGTH: usize = 64;

    /// Creates a validated invitation code.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationDomainError::InvalidCode`] when the value is
    /// empty, contains whitespace, or exceeds [`Self::MAX_LENGTH`].
    pub fn new(value: impl Into<String>) -> Result<Self, InvitationDomainError> {
        let raw = value.into();
        let is_valid = !raw.is_empty()
            && raw.len() <= Self::MAX_LENGTH
            && !raw.chars().any(char::is_whitespace);
        if !is_valid {
            return Err(InvitationDomainError::InvalidCode(raw));
        }
        Ok(Self(raw))
    }

    /// Renders a UUID as a 32 character lowercase hex code.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid.simple().to_string())
    }

    /// Returns the code as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for InvitationCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for InvitationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Address of the invited party.
///
/// The value is stored exactly as given. Comparisons against presented
/// addresses are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvitationEmail(String);

impl InvitationEmail {
    /// Longest address representable in the current `PostgreSQL` schema.
    pub const MAX_LENGTH: usize = 320;

    /// Creates a validated invitee email.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationDomainError::EmptyEmail`] when the value is empty,
    /// or [`InvitationDomainError::EmailTooLong`] when it exceeds
    /// [`Self::MAX_LENGTH`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, InvitationDomainError> {
        let raw = value.into();
        if raw.is_empty() {
            return Err(InvitationDomainError::EmptyEmail);
        }
        let length = raw.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(InvitationDomainError::EmailTooLong {
                length,
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(raw))
    }

    /// Returns the email as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns whether `other` is exactly this address.
    #[must_use]
    pub fn matches(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for InvitationEmail {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for InvitationEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the party that issued the invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferrerId(i64);

impl ReferrerId {
    /// Creates a validated referrer identifier.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationDomainError::InvalidReferrerId`] when the value is
    /// negative.
    pub const fn new(value: i64) -> Result<Self, InvitationDomainError> {
        if value < 0 {
            return Err(InvitationDomainError::InvalidReferrerId(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ReferrerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
