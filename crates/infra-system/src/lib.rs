// Watchdog Infrastructure - System Adapters
// Implements: ProcessInspector, SessionDriver, Notifier, LogRetention

pub mod command_session_driver;
pub mod desktop_notifier;
pub mod log_retention_impl;
pub mod process_inspector_impl;
pub mod run_status_file;

pub use command_session_driver::{CommandSessionDriver, SessionCommands};
pub use desktop_notifier::{DesktopNotifier, LogNotifier};
pub use log_retention_impl::FsLogRetention;
pub use process_inspector_impl::SysinfoProcessInspector;
pub use run_status_file::{read_run_status, write_run_status};
