//! Error types for invitation domain validation and parsing.

use super::{InvitationCode, InvitationStatus};
use thiserror::Error;

/// Errors returned while constructing domain invitation values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvitationDomainError {
    /// The invitee email is empty.
    #[error("invitation email must not be empty")]
    EmptyEmail,

    /// The invitee email is longer than storage allows.
    #[error("invitation email is {length} characters, at most {max} are allowed")]
    EmailTooLong {
        /// Length of the rejected address in characters.
        length: usize,
        /// Longest accepted address.
        max: usize,
    },

    /// The referrer identifier is negative.
    #[error("invalid referrer identifier {0}, expected a non-negative integer")]
    InvalidReferrerId(i64),

    /// The invitation code is empty or contains whitespace.
    #[error("invalid invitation code '{0}'")]
    InvalidCode(String),

    /// The lifecycle does not permit the requested status change.
    #[error("invitation {code} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        /// Invitation whose status change was rejected.
        code: InvitationCode,
        /// Status before the attempted change.
        from: InvitationStatus,
        /// Requested status.
        to: InvitationStatus,
    },
}

/// Error returned while parsing invitation statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown invitation status: {0}")]
pub struct ParseInvitationStatusError(pub String);
