// Monitor Configuration (validated at construction)

use std::time::Duration;
use tracing::warn;

/// Shortest allowed check interval (seconds)
pub const MIN_INTERVAL_SECS: u64 = 10;

/// Fewest allowed consecutive failures before recovery
pub const MIN_MAX_RETRIES: u32 = 1;

/// Shortest allowed login timeout (seconds)
pub const MIN_LOGIN_TIMEOUT_SECS: u64 = 1;

/// The cooldown between ticks is slept in this many segments
pub const SLEEP_SEGMENTS: u64 = 5;

/// Immutable configuration of the monitor loop
///
/// Only `new` builds one, so the floors always hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    interval_secs: u64,
    max_retries: u32,
    login_timeout_secs: u64,
    success_notify_every: u32,
}

impl MonitorConfig {
    /// Build a config, clamping values below their floors
    ///
    /// Invalid values are never rejected: each one is raised to its floor
    /// and a warning is logged.
    ///
    /// # Arguments
    /// * `interval_secs` - Delay between ticks (floor: 10)
    /// * `max_retries` - Consecutive failures that trigger recovery (floor: 1)
    /// * `login_timeout_secs` - Deadline handed to the recoverer (floor: 1)
    pub fn new(interval_secs: u64, max_retries: u32, login_timeout_secs: u64) -> Self {
        let interval_secs = if interval_secs < MIN_INTERVAL_SECS {
            warn!(
                requested = interval_secs,
                floor = MIN_INTERVAL_SECS,
                "Check interval too short, clamping"
            );
            MIN_INTERVAL_SECS
        } else {
            interval_secs
        };

        let max_retries = if max_retries < MIN_MAX_RETRIES {
            warn!(
                requested = max_retries,
                floor = MIN_MAX_RETRIES,
                "Max retries too low, clamping"
            );
            MIN_MAX_RETRIES
        } else {
            max_retries
        };

        let login_timeout_secs = if login_timeout_secs < MIN_LOGIN_TIMEOUT_SECS {
            warn!(
                requested = login_timeout_secs,
                floor = MIN_LOGIN_TIMEOUT_SECS,
                "Login timeout too short, clamping"
            );
            MIN_LOGIN_TIMEOUT_SECS
        } else {
            login_timeout_secs
        };

        Self {
            interval_secs,
            max_retries,
            login_timeout_secs,
            success_notify_every: 0,
        }
    }

    /// Notify success on every Nth tick (0 disables success notifications)
    pub fn with_success_notify_every(mut self, every: u32) -> Self {
        self.success_notify_every = every;
        self
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn login_timeout_secs(&self) -> u64 {
        self.login_timeout_secs
    }

    pub fn success_notify_every(&self) -> u32 {
        self.success_notify_every
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Length of one cooldown segment: interval / 5, at least one second
    pub fn sleep_segment(&self) -> Duration {
        Duration::from_secs((self.interval_secs / SLEEP_SEGMENTS).max(1))
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::new(30, 3, 60).with_success_notify_every(10)
    }
}
