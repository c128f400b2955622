//! Invitation aggregate root and lifecycle status types.

use super::{
    InvitationCode, InvitationDomainError, InvitationEmail, ParseInvitationStatusError, ReferrerId,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Invitation lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    /// Invitation is open and may be consumed or canceled.
    Pending,
    /// Single-use invitation has been consumed.
    Successful,
    /// Invitation was queried after its validity window closed.
    Expired,
    /// Invitation was withdrawn before use.
    Canceled,
}

impl InvitationStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Successful => "successful",
            Self::Expired => "expired",
            Self::Canceled => "canceled",
        }
    }

    /// Returns whether the lifecycle permits moving from `self` to `next`.
    ///
    /// `Pending` may loop back to itself (multi-use consumption) or move to
    /// any other status. Every status may be rewritten to `Expired` once the
    /// validity window has closed; nothing else leaves a finished status.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!((self, next), (Self::Pending, _) | (_, Self::Expired))
    }

    /// Returns whether no further consumption or cancellation is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl TryFrom<&str> for InvitationStatus {
    type Error = ParseInvitationStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "successful" => Ok(Self::Successful),
            "expired" => Ok(Self::Expired),
            "canceled" => Ok(Self::Canceled),
            _ => Err(ParseInvitationStatusError(value.to_owned())),
        }
    }
}

impl std::fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter object for issuing a new invitation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvitationData {
    /// Freshly generated referral code.
    pub code: InvitationCode,
    /// Invitee address.
    pub email: InvitationEmail,
    /// Issuing party.
    pub referrer_id: ReferrerId,
    /// Last instant at which the invitation is still valid.
    pub valid_until: DateTime<Utc>,
    /// Whether consumption keeps the invitation open.
    pub allow_multiple_use: bool,
}

/// Invitation aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    code: InvitationCode,
    email: InvitationEmail,
    referrer_id: ReferrerId,
    valid_until: DateTime<Utc>,
    status: InvitationStatus,
    allow_multiple_use: bool,
    use_count: u32,
    attributes: Map<String, Value>,
    revision: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted invitation aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedInvitationData {
    /// Persisted referral code.
    pub code: InvitationCode,
    /// Persisted invitee address.
    pub email: InvitationEmail,
    /// Persisted referrer identifier.
    pub referrer_id: ReferrerId,
    /// Persisted end of the validity window.
    pub valid_until: DateTime<Utc>,
    /// Persisted lifecycle status.
    pub status: InvitationStatus,
    /// Persisted multi-use flag.
    pub allow_multiple_use: bool,
    /// Persisted consumption counter.
    pub use_count: u32,
    /// Persisted caller-supplied attributes.
    pub attributes: Map<String, Value>,
    /// Persisted optimistic concurrency revision.
    pub revision: u64,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Invitation {
    /// Revision assigned to a freshly issued invitation.
    pub const INITIAL_REVISION: u64 = 1;

    /// Issues a new pending invitation.
    #[must_use]
    pub fn issue(data: NewInvitationData, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            code: data.code,
            email: data.email,
            referrer_id: data.referrer_id,
            valid_until: data.valid_until,
            status: InvitationStatus::Pending,
            allow_multiple_use: data.allow_multiple_use,
            use_count: 0,
            attributes: Map::new(),
            revision: Self::INITIAL_REVISION,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs an invitation from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedInvitationData) -> Self {
        Self {
            code: data.code,
            email: data.email,
            referrer_id: data.referrer_id,
            valid_until: data.valid_until,
            status: data.status,
            allow_multiple_use: data.allow_multiple_use,
            use_count: data.use_count,
            attributes: data.attributes,
            revision: data.revision,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the referral code.
    #[must_use]
    pub const fn code(&self) -> &InvitationCode {
        &self.code
    }

    /// Returns the invitee address.
    #[must_use]
    pub const fn email(&self) -> &InvitationEmail {
        &self.email
    }

    /// Returns the issuing party.
    #[must_use]
    pub const fn referrer_id(&self) -> ReferrerId {
        self.referrer_id
    }

    /// Returns the last instant at which the invitation is valid.
    #[must_use]
    pub const fn valid_until(&self) -> DateTime<Utc> {
        self.valid_until
    }

    /// Returns the stored lifecycle status.
    #[must_use]
    pub const fn status(&self) -> InvitationStatus {
        self.status
    }

    /// Returns whether consumption keeps the invitation open.
    #[must_use]
    pub const fn allow_multiple_use(&self) -> bool {
        self.allow_multiple_use
    }

    /// Returns how many times a multi-use invitation has been consumed.
    #[must_use]
    pub const fn use_count(&self) -> u32 {
        self.use_count
    }

    /// Returns caller-supplied attributes.
    #[must_use]
    pub const fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Returns the optimistic concurrency revision.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether the stored status is pending.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Returns whether `now` lies strictly after the validity window.
    #[must_use]
    pub fn is_past_validity(&self, now: DateTime<Utc>) -> bool {
        now > self.valid_until
    }

    /// Attaches an extra attribute, returning the value it replaced.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.attributes.insert(key.into(), value)
    }

    /// Records a successful consumption.
    ///
    /// Multi-use invitations stay pending and count the use; single-use
    /// invitations become successful with a zeroed counter.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationDomainError::InvalidStatusTransition`] unless the
    /// invitation is pending.
    pub fn consume(&mut self, clock: &impl Clock) -> Result<(), InvitationDomainError> {
        if self.allow_multiple_use {
            self.transition_to(InvitationStatus::Pending, clock)?;
            self.use_count = self.use_count.saturating_add(1);
        } else {
            self.transition_to(InvitationStatus::Successful, clock)?;
            self.use_count = 0;
        }
        Ok(())
    }

    /// Withdraws a pending invitation.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationDomainError::InvalidStatusTransition`] unless the
    /// invitation is pending.
    pub fn cancel(&mut self, clock: &impl Clock) -> Result<(), InvitationDomainError> {
        self.transition_to(InvitationStatus::Canceled, clock)
    }

    /// Marks the invitation as expired. Always permitted.
    pub fn expire(&mut self, clock: &impl Clock) {
        self.status = InvitationStatus::Expired;
        self.touch(clock);
    }

    /// Replaces the code of an invitation that has not been stored yet.
    pub(crate) fn reassign_code(&mut self, code: InvitationCode) {
        self.code = code;
    }

    fn transition_to(
        &mut self,
        next: InvitationStatus,
        clock: &impl Clock,
    ) -> Result<(), InvitationDomainError> {
        if !self.status.can_transition_to(next) {
            return Err(InvitationDomainError::InvalidStatusTransition {
                code: self.code.clone(),
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.touch(clock);
        Ok(())
    }

    /// Stamps a persisted mutation: bumps the revision and `updated_at`.
    fn touch(&mut self, clock: &impl Clock) {
        self.revision = self.revision.saturating_add(1);
        self.updated_at = clock.utc();
    }
}
