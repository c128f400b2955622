//! Invitation lifecycle management.
//!
//! Issues referral codes bound to an invitee email, a referrer and an
//! expiry instant, and tracks each code through `pending`, `successful`,
//! `expired` and `canceled`. Expiry is lazy: it is evaluated and persisted
//! when validity is queried. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
