//! Result of looking an invitation up by code.

use crate::invitation::domain::{Invitation, InvitationStatus};
use std::fmt;

/// An invitation lookup that may or may not have found a record.
///
/// A handle for an unknown code is a normal query result: every predicate
/// evaluated against it answers as if the invitation were invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationHandle {
    requested_code: String,
    invitation: Option<Invitation>,
}

impl InvitationHandle {
    pub(super) fn new(requested_code: impl Into<String>, invitation: Option<Invitation>) -> Self {
        Self {
            requested_code: requested_code.into(),
            invitation,
        }
    }

    /// Returns the code that was looked up.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.requested_code
    }

    /// Returns whether the lookup found a record.
    #[must_use]
    pub const fn is_existing(&self) -> bool {
        self.invitation.is_some()
    }

    /// Returns the record as last read or written through this handle.
    #[must_use]
    pub const fn invitation(&self) -> Option<&Invitation> {
        self.invitation.as_ref()
    }

    pub(super) fn invitation_mut(&mut self) -> Option<&mut Invitation> {
        self.invitation.as_mut()
    }
}

/// Status reported to callers after validity has been evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportedStatus {
    /// The code is unknown, expired, or no longer pending.
    Invalid,
    /// The invitation is valid and carries this stored status.
    Current(InvitationStatus),
}

impl ReportedStatus {
    /// Returns the reported status name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invalid => "Invalid",
            Self::Current(status) => status.as_str(),
        }
    }
}

impl fmt::Display for ReportedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
