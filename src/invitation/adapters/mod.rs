//! Adapter implementations for invitation ports.

pub mod memory;
pub mod postgres;

mod random_code;
mod tracing_notifier;

pub use random_code::RandomCodeGenerator;
pub use tracing_notifier::TracingNotifier;
