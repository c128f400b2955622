//! Lifecycle events published to invitation notifiers.

use super::Invitation;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Kind of lifecycle change being announced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationEventKind {
    /// The invitation was issued, or a reminder was requested.
    Created,
    /// The invitation was redeemed.
    Consumed,
    /// The invitation was withdrawn.
    Canceled,
    /// The invitation was found past its validity window.
    Expired,
}

impl InvitationEventKind {
    /// Returns the canonical event name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Consumed => "consumed",
            Self::Canceled => "canceled",
            Self::Expired => "expired",
        }
    }
}

/// A lifecycle event carrying a snapshot of the invitation it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationEvent {
    kind: InvitationEventKind,
    invitation: Invitation,
    occurred_at: DateTime<Utc>,
}

impl InvitationEvent {
    /// Creates an event stamped with the clock's current time.
    #[must_use]
    pub fn new(kind: InvitationEventKind, invitation: Invitation, clock: &impl Clock) -> Self {
        Self {
            kind,
            invitation,
            occurred_at: clock.utc(),
        }
    }

    /// Returns the event kind.
    #[must_use]
    pub const fn kind(&self) -> InvitationEventKind {
        self.kind
    }

    /// Returns the invitation snapshot taken when the event was raised.
    #[must_use]
    pub const fn invitation(&self) -> &Invitation {
        &self.invitation
    }

    /// Returns when the event was raised.
    #[must_use]
    pub const fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}
