//! Unit tests for the invitation domain and lifecycle service.


use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, Utc};
use mockable::Clock;
use mockall::mock;
use rstest::fixture;

use crate::invitation::{
    adapters::{
        RandomCodeGenerator,
        memory::{InMemoryInvitationRepository, RecordingNotifier},
    },
    domain::{Invitation, InvitationCode, InvitationEvent},
    ports::{
        CodeGenerator, InvitationNotifier, InvitationRepository, InvitationRepositoryResult,
        NotifierResult,
    },
    services::InvitationService,
};

/// 2026-01-15T12:00:00Z.
pub(super) const START_TIMESTAMP: i64 = 1_768_478_400;

pub(super) fn start() -> DateTime<Utc> {
    DateTime::from_timestamp(START_TIMESTAMP, 0).unwrap_or_default()
}

/// Clock whose time only moves when a test moves it.
#[derive(Debug, Clone)]
pub(super) struct AdjustableClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl AdjustableClock {
    pub(super) fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub(super) fn advance(&self, delta: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += delta;
    }
}

impl Clock for AdjustableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Hands out scripted codes first, then random ones.
#[derive(Debug, Default)]
pub(super) struct ScriptedCodeGenerator {
    scripted: Mutex<VecDeque<InvitationCode>>,
}

impl ScriptedCodeGenerator {
    pub(super) fn with_codes(codes: &[&str]) -> eyre::Result<Self> {
        let scripted = codes
            .iter()
            .map(|code| InvitationCode::new(*code))
            .collect::<Result<VecDeque<_>, _>>()?;
        Ok(Self {
            scripted: Mutex::new(scripted),
        })
    }
}

impl CodeGenerator for ScriptedCodeGenerator {
    fn generate(&self) -> InvitationCode {
        self.scripted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| RandomCodeGenerator.generate())
    }
}

mock! {
    pub Repository {}

    #[async_trait]
    impl InvitationRepository for Repository {
        async fn store(&self, invitation: &Invitation) -> InvitationRepositoryResult<()>;
        async fn update(&self, invitation: &Invitation) -> InvitationRepositoryResult<()>;
        async fn find_by_code(
            &self,
            code: &InvitationCode,
        ) -> InvitationRepositoryResult<Option<Invitation>>;
    }
}

mock! {
    pub Notifier {}

    #[async_trait]
    impl InvitationNotifier for Notifier {
        async fn emit(&self, event: &InvitationEvent) -> NotifierResult<()>;
    }
}

pub(super) type TestService = InvitationService<
    InMemoryInvitationRepository,
    RecordingNotifier,
    ScriptedCodeGenerator,
    AdjustableClock,
>;

/// Service wired to in-memory adapters with handles kept for inspection.
pub(super) struct Harness {
    pub(super) service: TestService,
    pub(super) repository: Arc<InMemoryInvitationRepository>,
    pub(super) notifier: Arc<RecordingNotifier>,
    pub(super) clock: AdjustableClock,
}

impl Harness {
    pub(super) fn with_codes(codes: ScriptedCodeGenerator) -> Self {
        let repository = Arc::new(InMemoryInvitationRepository::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let clock = AdjustableClock::at(start());
        let service = InvitationService::new(
            Arc::clone(&repository),
            Arc::clone(&notifier),
            Arc::new(codes),
            Arc::new(clock.clone()),
        );
        Self {
            service,
            repository,
            notifier,
            clock,
        }
    }

    pub(super) async fn stored(&self, code: &InvitationCode) -> eyre::Result<Invitation> {
        self.repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| eyre::eyre!("invitation {code} is not stored"))
    }
}

#[fixture]
pub(super) fn harness() -> Harness {
    Harness::with_codes(ScriptedCodeGenerator::default())
}
