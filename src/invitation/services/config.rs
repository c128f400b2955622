//! Runtime settings for the invitation service.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use thiserror::Error;

/// How the lazy expiry check treats records that already read `expired`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryPolicy {
    /// Rewrite the record and emit `Expired` on every check past the
    /// validity window.
    #[default]
    EveryCheck,
    /// Rewrite and emit only when the stored status is not yet `expired`.
    OnTransition,
}

/// Invitation service configuration.
///
/// Deserializes from JSON with every field optional:
///
/// ```
/// use invitations::invitation::services::{ExpiryPolicy, InvitationConfig};
///
/// let config = InvitationConfig::from_json(r#"{"expiry_policy": "on_transition"}"#)
///     .expect("valid configuration");
/// assert_eq!(config.expiry_policy(), ExpiryPolicy::OnTransition);
/// assert_eq!(config.max_code_attempts().get(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InvitationConfig {
    max_code_attempts: NonZeroU32,
    expiry_policy: ExpiryPolicy,
}

/// Error returned when a configuration document cannot be loaded.
#[derive(Debug, Error)]
#[error("invalid invitation configuration: {0}")]
pub struct InvitationConfigError(#[from] serde_json::Error);

impl InvitationConfig {
    const DEFAULT_MAX_CODE_ATTEMPTS: NonZeroU32 = match NonZeroU32::new(5) {
        Some(attempts) => attempts,
        None => NonZeroU32::MIN,
    };

    /// Creates the default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_code_attempts: Self::DEFAULT_MAX_CODE_ATTEMPTS,
            expiry_policy: ExpiryPolicy::EveryCheck,
        }
    }

    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationConfigError`] when the document is malformed,
    /// names an unknown field, or sets `max_code_attempts` to zero.
    pub fn from_json(document: &str) -> Result<Self, InvitationConfigError> {
        Ok(serde_json::from_str(document)?)
    }

    /// Sets how many codes `create` tries before giving up.
    #[must_use]
    pub const fn with_max_code_attempts(mut self, attempts: NonZeroU32) -> Self {
        self.max_code_attempts = attempts;
        self
    }

    /// Sets the expiry rewrite policy.
    #[must_use]
    pub const fn with_expiry_policy(mut self, policy: ExpiryPolicy) -> Self {
        self.expiry_policy = policy;
        self
    }

    /// Returns how many codes `create` tries before giving up.
    #[must_use]
    pub const fn max_code_attempts(&self) -> NonZeroU32 {
        self.max_code_attempts
    }

    /// Returns the expiry rewrite policy.
    #[must_use]
    pub const fn expiry_policy(&self) -> ExpiryPolicy {
        self.expiry_policy
    }
}

impl Default for InvitationConfig {
    fn default() -> Self {
        Self::new()
    }
}
