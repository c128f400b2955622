//! Domain model for invitation lifecycle management.
//!
//! The invitation domain models code issuance, the status state machine and
//! lifecycle events while keeping storage, delivery and randomness outside
//! of the domain boundary.

mod error;
mod event;
mod ids;
mod invitation;

pub use error::{InvitationDomainError, ParseInvitationStatusError};
pub use event::{InvitationEvent, InvitationEventKind};
pub use ids::{InvitationCode, InvitationEmail, ReferrerId};
pub use invitation::{Invitation, InvitationStatus, NewInvitationData, PersistedInvitationData};
