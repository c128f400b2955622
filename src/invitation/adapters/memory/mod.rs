//! In-memory adapters for tests and embedded hosts.

mod notifier;
mod repository;

pub use notifier::RecordingNotifier;
pub use repository::InMemoryInvitationRepository;
