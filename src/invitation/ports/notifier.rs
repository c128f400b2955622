//! Notifier port for invitation lifecycle events.

use crate::invitation::domain::InvitationEvent;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for notifier operations.
pub type NotifierResult<T> = Result<T, NotifierError>;

/// Receives lifecycle events for downstream side effects.
///
/// Delivery is fire-and-forget from the service's point of view: a returned
/// error is logged and never undoes the state change that raised the event.
#[async_trait]
pub trait InvitationNotifier: Send + Sync {
    /// Publishes one event.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError`] when the event could not be handed off.
    async fn emit(&self, event: &InvitationEvent) -> NotifierResult<()>;
}

/// Errors returned by notifier implementations.
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    /// The downstream channel rejected or dropped the event.
    #[error("event delivery failed: {0}")]
    Delivery(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotifierError {
    /// Wraps a delivery error.
    pub fn delivery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Delivery(Arc::new(err))
    }
}
