//! Application services for invitation lifecycle orchestration.

mod config;
mod handle;
mod lifecycle;

pub use config::{ExpiryPolicy, InvitationConfig, InvitationConfigError};
pub use handle::{InvitationHandle, ReportedStatus};
pub use lifecycle::{
    BeforeSaveHook, CreateInvitationRequest, InvitationService, InvitationServiceError,
    InvitationServiceResult,
};
