// Monitor constants (No magic values)
use std::time::Duration;

/// Log a statistics line every N ticks
pub const STATS_LOG_EVERY_TICKS: u64 = 10;

/// Interval between login-state probes while waiting for a login
pub const LOGIN_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Grace period after auto-starting the client before the next probe
pub const CLIENT_STARTUP_GRACE: Duration = Duration::from_secs(5);

/// Notification titles
pub const TITLE_STATUS_OK: &str = "Client status normal";
pub const TITLE_STATUS_ABNORMAL: &str = "Client status abnormal";
pub const TITLE_RECOVERED: &str = "Client session recovered";
pub const TITLE_RECOVERY_FAILED: &str = "Automatic login failed";
pub const TITLE_LOGIN_REQUIRED: &str = "Login required";
pub const TITLE_LOGIN_SUCCEEDED: &str = "Login succeeded";
pub const TITLE_LOGIN_TIMEOUT: &str = "Login timed out";

/// Daemon lifecycle notification titles
pub const TITLE_MONITOR_STARTED: &str = "Monitor started";
pub const TITLE_MONITOR_STOPPED: &str = "Monitor stopped";
pub const TITLE_FATAL_ERROR: &str = "Monitor fatal error";
