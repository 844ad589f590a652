// Application Layer - Use Cases and Business Logic

pub mod maintenance;
pub mod monitor;
pub mod poll;
pub mod recovery;
pub mod retry;
pub mod status;

// Re-exports
pub use maintenance::LogMaintenanceScheduler;
pub use monitor::{shutdown_channel, MonitorLoop, ShutdownSender, ShutdownToken};
pub use poll::poll_until;
pub use recovery::LoginRecoverer;
pub use retry::{RetryDecision, RetryPolicy};
pub use status::{ClientSettings, ClientStatusChecker};
