//! Invitations: referral code issuance and lifecycle tracking.
//!
//! This crate issues unique invitation codes bound to an email, a referrer
//! and an expiry instant, and answers whether a presented code may still be
//! consumed by a given email.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage, notification and
//!   code generation
//! - **Adapters**: Concrete implementations of ports (in-memory,
//!   `PostgreSQL`, `tracing`)
//!
//! # Modules
//!
//! - [`invitation`]: Invitation state machine and validity evaluation

pub mod invitation;
