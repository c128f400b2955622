//! Code generator backed by the operating system's secure random source.

use uuid::Uuid;

use crate::invitation::{domain::InvitationCode, ports::CodeGenerator};

/// Generates 32 character hex codes from random (version 4) UUIDs.
///
/// Each code carries 122 random bits drawn from the OS generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> InvitationCode {
        InvitationCode::from_uuid(Uuid::new_v4())
    }
}
