//! Diesel row models for invitation persistence.

use super::schema::invitations;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for invitation records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = invitations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InvitationRow {
    /// Referral code.
    pub code: String,
    /// Invitee address.
    pub email: String,
    /// Issuing party.
    pub referrer_id: i64,
    /// End of the validity window.
    pub valid_until: DateTime<Utc>,
    /// Lifecycle status.
    pub status: String,
    /// Multi-use flag.
    pub allow_multiple_use: bool,
    /// Multi-use consumption counter.
    pub use_count: i32,
    /// Caller-supplied attributes as a JSON object.
    pub attributes: Value,
    /// Optimistic concurrency revision.
    pub revision: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for invitation records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = invitations)]
pub struct NewInvitationRow {
    /// Referral code.
    pub code: String,
    /// Invitee address.
    pub email: String,
    /// Issuing party.
    pub referrer_id: i64,
    /// End of the validity window.
    pub valid_until: DateTime<Utc>,
    /// Lifecycle status.
    pub status: String,
    /// Multi-use flag.
    pub allow_multiple_use: bool,
    /// Multi-use consumption counter.
    pub use_count: i32,
    /// Caller-supplied attributes as a JSON object.
    pub attributes: Value,
    /// Optimistic concurrency revision.
    pub revision: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Mutable columns written by lifecycle transitions.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = invitations)]
pub struct InvitationChangeset {
    /// Lifecycle status.
    pub status: String,
    /// Multi-use consumption counter.
    pub use_count: i32,
    /// Caller-supplied attributes as a JSON object.
    pub attributes: Value,
    /// Optimistic concurrency revision.
    pub revision: i64,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
