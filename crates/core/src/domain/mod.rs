// Domain Layer - Pure monitoring state and value types

pub mod config;
pub mod error;
pub mod loop_state;
pub mod run_status;

// Re-exports
pub use config::MonitorConfig;
pub use error::ProbeError;
pub use loop_state::{ExitReason, LoopOutcome, LoopState, LoopStats};
pub use run_status::{RunStatus, ShutdownReason};
