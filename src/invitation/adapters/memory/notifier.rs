//! Notifier that keeps every published event in memory.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::invitation::{
    domain::{InvitationEvent, InvitationEventKind},
    ports::{InvitationNotifier, NotifierError, NotifierResult},
};

/// Thread-safe notifier recording events in publication order.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    events: Arc<RwLock<Vec<InvitationEvent>>>,
}

impl RecordingNotifier {
    /// Creates a notifier with no recorded events.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all recorded events.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::Delivery`] when the lock is poisoned.
    pub fn events(&self) -> NotifierResult<Vec<InvitationEvent>> {
        let events = self.events.read().map_err(|err| poisoned(&err))?;
        Ok(events.clone())
    }

    /// Returns the kinds of all recorded events.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::Delivery`] when the lock is poisoned.
    pub fn kinds(&self) -> NotifierResult<Vec<InvitationEventKind>> {
        let events = self.events.read().map_err(|err| poisoned(&err))?;
        Ok(events.iter().map(InvitationEvent::kind).collect())
    }
}

fn poisoned(err: &impl std::fmt::Display) -> NotifierError {
    NotifierError::delivery(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl InvitationNotifier for RecordingNotifier {
    async fn emit(&self, event: &InvitationEvent) -> NotifierResult<()> {
        let mut events = self.events.write().map_err(|err| poisoned(&err))?;
        events.push(event.clone());
        Ok(())
    }
}
