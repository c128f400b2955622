//! Step definitions for invitation lifecycle BDD scenarios.

pub mod given;
pub mod world;
