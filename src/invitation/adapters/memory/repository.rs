//! In-memory repository for invitation lifecycle tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::invitation::{
    domain::{Invitation, InvitationCode},
    ports::{InvitationRepository, InvitationRepositoryError, InvitationRepositoryResult},
};

/// Thread-safe in-memory invitation repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInvitationRepository {
    invitations: Arc<RwLock<HashMap<InvitationCode, Invitation>>>,
}

impl InMemoryInvitationRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored invitations.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationRepositoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn len(&self) -> InvitationRepositoryResult<usize> {
        let invitations = self.invitations.read().map_err(|err| poisoned(&err))?;
        Ok(invitations.len())
    }

    /// Returns whether the repository holds no invitations.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationRepositoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn is_empty(&self) -> InvitationRepositoryResult<bool> {
        Ok(self.len()? == 0)
    }
}

fn poisoned(err: &impl std::fmt::Display) -> InvitationRepositoryError {
    InvitationRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl InvitationRepository for InMemoryInvitationRepository {
    async fn store(&self, invitation: &Invitation) -> InvitationRepositoryResult<()> {
        let mut invitations = self.invitations.write().map_err(|err| poisoned(&err))?;
        if invitations.contains_key(invitation.code()) {
            return Err(InvitationRepositoryError::DuplicateCode(
                invitation.code().clone(),
            ));
        }
        invitations.insert(invitation.code().clone(), invitation.clone());
        Ok(())
    }

    async fn update(&self, invitation: &Invitation) -> InvitationRepositoryResult<()> {
        let mut invitations = self.invitations.write().map_err(|err| poisoned(&err))?;
        let stored = invitations
            .get_mut(invitation.code())
            .ok_or_else(|| InvitationRepositoryError::NotFound(invitation.code().clone()))?;

        let expected = invitation.revision().saturating_sub(1);
        if stored.revision() != expected {
            return Err(InvitationRepositoryError::StaleRevision {
                code: invitation.code().clone(),
                expected,
                found: stored.revision(),
            });
        }

        *stored = invitation.clone();
        Ok(())
    }

    async fn find_by_code(
        &self,
        code: &InvitationCode,
    ) -> InvitationRepositoryResult<Option<Invitation>> {
        let invitations = self.invitations.read().map_err(|err| poisoned(&err))?;
        Ok(invitations.get(code).cloned())
    }
}
