//! Shared world state for invitation lifecycle BDD scenarios.

use std::sync::Arc;

use invitations::invitation::{
    adapters::{
        RandomCodeGenerator,
        memory::{InMemoryInvitationRepository, RecordingNotifier},
    },
    services::{InvitationHandle, InvitationService},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestInvitationService = InvitationService<
    InMemoryInvitationRepository,
    RecordingNotifier,
    RandomCodeGenerator,
    DefaultClock,
>;

/// Scenario world for invitation lifecycle behaviour tests.
pub struct InvitationWorld {
    pub service: TestInvitationService,
    pub notifier: Arc<RecordingNotifier>,
    pub handle: Option<InvitationHandle>,
    pub last_outcome: Option<bool>,
}

impl InvitationWorld {
    /// Creates a world with no invitation under test.
    #[must_use]
    pub fn new() -> Self {
        let notifier = Arc::new(RecordingNotifier::new());
        let service = InvitationService::new(
            Arc::new(InMemoryInvitationRepository::new()),
            Arc::clone(&notifier),
            Arc::new(RandomCodeGenerator),
            Arc::new(DefaultClock),
        );

        Self {
            service,
            notifier,
            handle: None,
            last_outcome: None,
        }
    }
}

impl Default for InvitationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> InvitationWorld {
    InvitationWorld::default()
}

/// Returns the handle of the invitation under test.
///
/// Takes the field rather than the world so steps can borrow the service
/// alongside it.
pub fn require_handle(
    handle: &mut Option<InvitationHandle>,
) -> Result<&mut InvitationHandle, eyre::Report> {
    handle
        .as_mut()
        .ok_or_else(|| eyre::eyre!("missing invitation handle in scenario world"))
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
