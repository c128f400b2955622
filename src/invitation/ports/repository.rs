//! Repository port for invitation persistence and lookup.

use crate::invitation::domain::{Invitation, InvitationCode};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for invitation repository operations.
pub type InvitationRepositoryResult<T> = Result<T, InvitationRepositoryError>;

/// Invitation persistence contract.
///
/// Implementations must give read-your-writes consistency per code and must
/// serialize updates to the same code through the revision check described
/// on [`InvitationRepository::update`].
#[async_trait]
pub trait InvitationRepository: Send + Sync {
    /// Stores a newly issued invitation.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationRepositoryError::DuplicateCode`] when the code is
    /// already taken.
    async fn store(&self, invitation: &Invitation) -> InvitationRepositoryResult<()>;

    /// Persists a mutation of an existing invitation.
    ///
    /// The stored record must be at revision `invitation.revision() - 1`.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationRepositoryError::NotFound`] when no record has the
    /// code, or [`InvitationRepositoryError::StaleRevision`] when another
    /// writer updated the record first.
    async fn update(&self, invitation: &Invitation) -> InvitationRepositoryResult<()>;

    /// Finds an invitation by code.
    ///
    /// Returns `None` when no invitation has the code.
    async fn find_by_code(
        &self,
        code: &InvitationCode,
    ) -> InvitationRepositoryResult<Option<Invitation>>;
}

/// Errors returned by invitation repository implementations.
#[derive(Debug, Clone, Error)]
pub enum InvitationRepositoryError {
    /// An invitation with the same code already exists.
    #[error("duplicate invitation code: {0}")]
    DuplicateCode(InvitationCode),

    /// The invitation was not found.
    #[error("invitation not found: {0}")]
    NotFound(InvitationCode),

    /// The stored record moved past the revision the update was based on.
    #[error("stale revision for invitation {code}: expected {expected}, found {found}")]
    StaleRevision {
        /// Invitation being updated.
        code: InvitationCode,
        /// Revision the update was based on.
        expected: u64,
        /// Revision currently stored.
        found: u64,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl InvitationRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
