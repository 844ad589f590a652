// Monitor Loop State

use serde::{Deserialize, Serialize};

/// Mutable state of one monitor loop run
///
/// Owned exclusively by the loop and mutated only between ticks.
/// `consecutive_failures` never exceeds the configured `max_retries`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopState {
    pub tick_count: u64,
    pub consecutive_failures: u32,
    pub cancelled: bool,
    pub successful_checks: u64,
    pub recovery_attempts: u64,
    pub recoveries: u64,
}

impl LoopState {
    /// Snapshot of the counters worth reporting
    pub fn stats(&self) -> LoopStats {
        LoopStats {
            ticks: self.tick_count,
            successful_checks: self.successful_checks,
            recovery_attempts: self.recovery_attempts,
            recoveries: self.recoveries,
        }
    }
}

/// Counters reported when the loop exits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopStats {
    pub ticks: u64,
    pub successful_checks: u64,
    pub recovery_attempts: u64,
    pub recoveries: u64,
}

impl LoopStats {
    /// Percentage of ticks whose status check succeeded
    pub fn success_rate(&self) -> f64 {
        if self.ticks == 0 {
            return 0.0;
        }
        self.successful_checks as f64 / self.ticks as f64 * 100.0
    }
}

/// Why the monitor loop stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    /// Shutdown was requested through the token
    Cancelled,
    /// An unrecoverable error (resource exhaustion) ended the loop
    FatalError(String),
}

impl std::fmt::Display for ExitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitReason::Cancelled => write!(f, "cancelled"),
            ExitReason::FatalError(msg) => write!(f, "fatal error: {}", msg),
        }
    }
}

/// Exit reason together with the run's counters
#[derive(Debug, Clone, PartialEq)]
pub struct LoopOutcome {
    pub exit_reason: ExitReason,
    pub stats: LoopStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rate_empty() {
        assert_eq!(LoopStats::default().success_rate(), 0.0);
    }

    #[test]
    fn test_success_rate() {
        let stats = LoopStats {
            ticks: 8,
            successful_checks: 6,
            ..Default::default()
        };
        assert!((stats.success_rate() - 75.0).abs() < f64::EPSILON);
    }
}
