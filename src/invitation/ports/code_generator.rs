//! Port for producing fresh invitation codes.

use crate::invitation::domain::InvitationCode;

/// Source of unpredictable invitation codes.
///
/// Implementations must make collisions negligible. The service still
/// retries with a new code when the repository reports a duplicate.
pub trait CodeGenerator: Send + Sync {
    /// Produces a new code.
    fn generate(&self) -> InvitationCode;
}
