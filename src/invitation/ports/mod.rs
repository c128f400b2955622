//! Port contracts for invitation lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by invitation
//! services.

pub mod code_generator;
pub mod notifier;
pub mod repository;

pub use code_generator::CodeGenerator;
pub use notifier::{InvitationNotifier, NotifierError, NotifierResult};
pub use repository::{InvitationRepository, InvitationRepositoryError, InvitationRepositoryResult};
