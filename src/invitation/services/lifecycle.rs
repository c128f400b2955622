//! Service layer implementing the invitation lifecycle state machine.

use crate::invitation::{
    domain::{
        Invitation, InvitationCode, InvitationDomainError, InvitationEmail, InvitationEvent,
        InvitationEventKind, InvitationStatus, NewInvitationData, ReferrerId,
    },
    ports::{CodeGenerator, InvitationNotifier, InvitationRepository, InvitationRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{ExpiryPolicy, InvitationConfig, InvitationHandle, ReportedStatus};

/// Mutation applied to a new invitation right before it is first stored.
pub type BeforeSaveHook = Box<dyn FnOnce(&mut Invitation) + Send>;

/// Request payload for issuing an invitation.
pub struct CreateInvitationRequest {
    email: String,
    referrer_id: i64,
    expires_at: DateTime<Utc>,
    allow_multiple_use: bool,
    before_save: Option<BeforeSaveHook>,
}

impl CreateInvitationRequest {
    /// Creates a single-use invitation request.
    #[must_use]
    pub fn new(email: impl Into<String>, referrer_id: i64, expires_at: DateTime<Utc>) -> Self {
        Self {
            email: email.into(),
            referrer_id,
            expires_at,
            allow_multiple_use: false,
            before_save: None,
        }
    }

    /// Sets whether consumption keeps the invitation open.
    #[must_use]
    pub fn with_multiple_use(mut self, allow_multiple_use: bool) -> Self {
        self.allow_multiple_use = allow_multiple_use;
        self
    }

    /// Sets a hook that may attach extra attributes before persistence.
    #[must_use]
    pub fn with_before_save(mut self, hook: impl FnOnce(&mut Invitation) + Send + 'static) -> Self {
        self.before_save = Some(Box::new(hook));
        self
    }
}

impl fmt::Debug for CreateInvitationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateInvitationRequest")
            .field("email", &self.email)
            .field("referrer_id", &self.referrer_id)
            .field("expires_at", &self.expires_at)
            .field("allow_multiple_use", &self.allow_multiple_use)
            .field("before_save", &self.before_save.is_some())
            .finish()
    }
}

/// Service-level errors for invitation lifecycle operations.
#[derive(Debug, Error)]
pub enum InvitationServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] InvitationDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] InvitationRepositoryError),
    /// The presented code does not resolve to an invitation.
    #[error("invalid token {0}")]
    InvalidToken(String),
    /// Every generated code collided with a stored invitation.
    #[error("no unique invitation code after {attempts} attempts")]
    CodeGenerationExhausted {
        /// Number of codes tried.
        attempts: u32,
    },
}

/// Result type for invitation service operations.
pub type InvitationServiceResult<T> = Result<T, InvitationServiceError>;

/// Invitation lifecycle orchestration service.
///
/// Holds no per-invitation state: every record lives in the repository and
/// in the [`InvitationHandle`] returned by a lookup. Predicates take the
/// handle mutably because the expiry check rewrites the record it carries.
#[derive(Clone)]
pub struct InvitationService<R, N, G, C>
where
    R: InvitationRepository,
    N: InvitationNotifier,
    G: CodeGenerator,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    notifier: Arc<N>,
    codes: Arc<G>,
    clock: Arc<C>,
    config: InvitationConfig,
}

impl<R, N, G, C> InvitationService<R, N, G, C>
where
    R: InvitationRepository,
    N: InvitationNotifier,
    G: CodeGenerator,
    C: Clock + Send + Sync,
{
    /// Creates a new invitation service with the default configuration.
    #[must_use]
    pub const fn new(repository: Arc<R>, notifier: Arc<N>, codes: Arc<G>, clock: Arc<C>) -> Self {
        Self {
            repository,
            notifier,
            codes,
            clock,
            config: InvitationConfig::new(),
        }
    }

    /// Replaces the service configuration.
    #[must_use]
    pub fn with_config(mut self, config: InvitationConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &InvitationConfig {
        &self.config
    }

    /// Issues a new pending invitation and returns its code.
    ///
    /// A duplicate-code rejection from the repository is retried with a
    /// fresh code. The `before_save` hook runs once, before the first
    /// attempt.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationServiceError::Domain`] for an empty email or a
    /// negative referrer, [`InvitationServiceError::CodeGenerationExhausted`]
    /// when every attempt collided, and
    /// [`InvitationServiceError::Repository`] for any other storage failure.
    pub async fn create(
        &self,
        request: CreateInvitationRequest,
    ) -> InvitationServiceResult<InvitationCode> {
        let CreateInvitationRequest {
            email,
            referrer_id,
            expires_at,
            allow_multiple_use,
            before_save,
        } = request;

        let data = NewInvitationData {
            code: self.codes.generate(),
            email: InvitationEmail::new(email)?,
            referrer_id: ReferrerId::new(referrer_id)?,
            valid_until: expires_at,
            allow_multiple_use,
        };
        let mut invitation = Invitation::issue(data, &*self.clock);
        if let Some(hook) = before_save {
            hook(&mut invitation);
        }

        self.store_with_fresh_codes(&mut invitation).await?;
        info!(
            code = %invitation.code(),
            referrer_id = invitation.referrer_id().value(),
            valid_until = %invitation.valid_until(),
            allow_multiple_use = invitation.allow_multiple_use(),
            "invitation created"
        );

        self.publish(InvitationEventKind::Created, &invitation).await;
        Ok(invitation.code().clone())
    }

    /// Looks an invitation up by code.
    ///
    /// An unknown or malformed code yields a non-existing handle rather than
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationServiceError::Repository`] when the lookup fails.
    pub async fn load_by_code(&self, code: &str) -> InvitationServiceResult<InvitationHandle> {
        let Ok(parsed) = InvitationCode::new(code) else {
            debug!(code, "malformed invitation code");
            return Ok(InvitationHandle::new(code, None));
        };

        let invitation = self.repository.find_by_code(&parsed).await?;
        debug!(code, found = invitation.is_some(), "invitation lookup");
        Ok(InvitationHandle::new(code, invitation))
    }

    /// Looks an invitation up by code, requiring it to exist.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationServiceError::InvalidToken`] when no invitation has
    /// the code, or [`InvitationServiceError::Repository`] when the lookup
    /// fails.
    pub async fn require_by_code(&self, code: &str) -> InvitationServiceResult<InvitationHandle> {
        let handle = self.load_by_code(code).await?;
        if !handle.is_existing() {
            return Err(InvitationServiceError::InvalidToken(code.to_owned()));
        }
        Ok(handle)
    }

    /// Returns whether the lookup behind `handle` found a record.
    #[must_use]
    pub const fn is_existing(&self, handle: &InvitationHandle) -> bool {
        handle.is_existing()
    }

    /// Returns how often a multi-use invitation has been consumed.
    #[must_use]
    pub fn use_count(&self, handle: &InvitationHandle) -> u32 {
        handle.invitation().map_or(0, Invitation::use_count)
    }

    /// Reports `Invalid` unless the invitation is valid, otherwise its
    /// stored status.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationServiceError::Repository`] when the expiry
    /// write fails.
    pub async fn status(
        &self,
        handle: &mut InvitationHandle,
    ) -> InvitationServiceResult<ReportedStatus> {
        if !self.is_valid(handle).await? {
            return Ok(ReportedStatus::Invalid);
        }
        Ok(handle
            .invitation()
            .map_or(ReportedStatus::Invalid, |invitation| {
                ReportedStatus::Current(invitation.status())
            }))
    }

    /// Returns whether the invitation is past its validity window.
    ///
    /// A missing invitation counts as expired. Past the window the record
    /// is rewritten as `expired`, persisted, and an `Expired` event is
    /// emitted; [`ExpiryPolicy`] decides whether that repeats for records
    /// already marked expired. When a concurrent write moved the record on,
    /// the stored record is adopted into the handle instead.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationServiceError::Repository`] when the expiry
    /// write fails.
    pub async fn is_expired(&self, handle: &mut InvitationHandle) -> InvitationServiceResult<bool> {
        let Some(current) = handle.invitation_mut() else {
            return Ok(true);
        };
        if !current.is_past_validity(self.clock.utc()) {
            return Ok(false);
        }
        if current.status() == InvitationStatus::Expired
            && self.config.expiry_policy() == ExpiryPolicy::OnTransition
        {
            return Ok(true);
        }

        let mut next = current.clone();
        next.expire(&*self.clock);
        let outcome = self
            .commit(current, next, InvitationEventKind::Expired)
            .await;
        match outcome {
            Ok(()) => Ok(true),
            Err(InvitationServiceError::Repository(InvitationRepositoryError::StaleRevision {
                ..
            })) => {
                // Another writer got there first; the window is closed either way.
                if let Some(latest) = self.repository.find_by_code(current.code()).await? {
                    debug!(
                        code = %latest.code(),
                        status = latest.status().as_str(),
                        revision = latest.revision(),
                        "expiry raced a concurrent write, adopted stored record"
                    );
                    *current = latest;
                }
                Ok(true)
            }
            Err(err) => Err(err),
        }
    }

    /// Returns whether the stored status is pending.
    #[must_use]
    pub fn is_pending(&self, handle: &InvitationHandle) -> bool {
        handle.invitation().is_some_and(Invitation::is_pending)
    }

    /// Returns whether the invitation is unexpired and pending.
    ///
    /// Expiry is evaluated first and may persist an expiry rewrite.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationServiceError::Repository`] when the expiry
    /// write fails.
    pub async fn is_valid(&self, handle: &mut InvitationHandle) -> InvitationServiceResult<bool> {
        Ok(!self.is_expired(handle).await? && self.is_pending(handle))
    }

    /// Returns whether the invitation is valid and was issued to exactly
    /// `email`.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationServiceError::Repository`] when the expiry
    /// write fails.
    pub async fn is_allowed(
        &self,
        handle: &mut InvitationHandle,
        email: &str,
    ) -> InvitationServiceResult<bool> {
        Ok(self.is_valid(handle).await?
            && handle
                .invitation()
                .is_some_and(|invitation| invitation.email().matches(email)))
    }

    /// Redeems a valid invitation.
    ///
    /// Returns `false` without touching the record when the invitation is
    /// not valid.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationServiceError::Repository`] when persistence fails.
    pub async fn consume(&self, handle: &mut InvitationHandle) -> InvitationServiceResult<bool> {
        self.transition(handle, InvitationEventKind::Consumed, Invitation::consume)
            .await
    }

    /// Withdraws a valid invitation.
    ///
    /// Returns `false` without touching the record when the invitation is
    /// not valid.
    ///
    /// # Errors
    ///
    /// Returns [`InvitationServiceError::Repository`] when persistence fails.
    pub async fn cancel(&self, handle: &mut InvitationHandle) -> InvitationServiceResult<bool> {
        self.transition(handle, InvitationEventKind::Canceled, Invitation::cancel)
            .await
    }

    /// Announces the invitation again as `Created`, regardless of validity.
    ///
    /// Always reports success; a missing invitation has nothing to announce.
    pub async fn reminder(&self, handle: &InvitationHandle) -> bool {
        if let Some(invitation) = handle.invitation() {
            self.publish(InvitationEventKind::Created, invitation).await;
        }
        true
    }

    async fn transition(
        &self,
        handle: &mut InvitationHandle,
        kind: InvitationEventKind,
        apply: fn(&mut Invitation, &C) -> Result<(), InvitationDomainError>,
    ) -> InvitationServiceResult<bool> {
        if !self.is_valid(handle).await? {
            return Ok(false);
        }
        let Some(current) = handle.invitation_mut() else {
            return Ok(false);
        };

        let mut next = current.clone();
        apply(&mut next, &*self.clock)?;
        self.commit(current, next, kind).await?;
        Ok(true)
    }

    /// Persists `next`, adopts it into the handle, and announces it.
    async fn commit(
        &self,
        current: &mut Invitation,
        next: Invitation,
        kind: InvitationEventKind,
    ) -> InvitationServiceResult<()> {
        self.repository.update(&next).await?;
        debug!(
            code = %next.code(),
            from = current.status().as_str(),
            to = next.status().as_str(),
            use_count = next.use_count(),
            "invitation status written"
        );
        *current = next;
        self.publish(kind, current).await;
        Ok(())
    }

    async fn store_with_fresh_codes(
        &self,
        invitation: &mut Invitation,
    ) -> InvitationServiceResult<()> {
        let attempts = self.config.max_code_attempts().get();
        let mut attempt = 1;
        loop {
            match self.repository.store(invitation).await {
                Ok(()) => return Ok(()),
                Err(InvitationRepositoryError::DuplicateCode(code)) if attempt < attempts => {
                    warn!(%code, attempt, "invitation code collision, regenerating");
                    invitation.reassign_code(self.codes.generate());
                    attempt += 1;
                }
                Err(InvitationRepositoryError::DuplicateCode(_)) => {
                    return Err(InvitationServiceError::CodeGenerationExhausted { attempts });
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    async fn publish(&self, kind: InvitationEventKind, invitation: &Invitation) {
        let event = InvitationEvent::new(kind, invitation.clone(), &*self.clock);
        if let Err(err) = self.notifier.emit(&event).await {
            warn!(
                event = kind.as_str(),
                code = %invitation.code(),
                error = %err,
                "invitation notifier failed, event dropped"
            );
        }
    }
}
