// Port Layer - Interfaces for external dependencies

pub mod log_retention;
pub mod notifier;
pub mod process_inspector;
pub mod recoverer;
pub mod session_driver;
pub mod status_checker;
pub mod time_provider;

// Re-exports
pub use log_retention::{LogRetention, PurgeStats};
pub use notifier::{Notifier, NotifyError};
pub use process_inspector::ProcessInspector;
pub use recoverer::Recoverer;
pub use session_driver::SessionDriver;
pub use status_checker::StatusChecker;
pub use time_provider::TimeProvider;
