//! Notifier that writes lifecycle events to the `tracing` pipeline.

use async_trait::async_trait;
use tracing::info;

use crate::invitation::{
    domain::InvitationEvent,
    ports::{InvitationNotifier, NotifierResult},
};

/// Log-only notifier for hosts without a downstream event channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl InvitationNotifier for TracingNotifier {
    async fn emit(&self, event: &InvitationEvent) -> NotifierResult<()> {
        let invitation = event.invitation();
        info!(
            event = event.kind().as_str(),
            code = %invitation.code(),
            referrer_id = invitation.referrer_id().value(),
            status = invitation.status().as_str(),
            use_count = invitation.use_count(),
            occurred_at = %event.occurred_at(),
            "invitation lifecycle event"
        );
        Ok(())
    }
}
