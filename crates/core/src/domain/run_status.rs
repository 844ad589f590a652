// Run Status - summary persisted when the daemon shuts down

use super::loop_state::LoopStats;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Why the daemon shut down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShutdownReason {
    Normal,
    Signal,
    Fatal,
}

impl std::fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShutdownReason::Normal => write!(f, "normal"),
            ShutdownReason::Signal => write!(f, "signal"),
            ShutdownReason::Fatal => write!(f, "fatal"),
        }
    }
}

/// Record of the last daemon run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStatus {
    pub last_run_time: DateTime<Utc>,
    pub shutdown_time: DateTime<Utc>,
    pub runtime_seconds: f64,
    pub shutdown_reason: ShutdownReason,
    pub total_checks: u64,
    pub successful_checks: u64,
}

impl RunStatus {
    /// Build a status from start/end timestamps (millis since epoch)
    pub fn new(
        started_at_ms: i64,
        ended_at_ms: i64,
        shutdown_reason: ShutdownReason,
        stats: LoopStats,
    ) -> Self {
        let runtime_ms = (ended_at_ms - started_at_ms).max(0);
        Self {
            last_run_time: millis_to_utc(started_at_ms),
            shutdown_time: millis_to_utc(ended_at_ms),
            runtime_seconds: runtime_ms as f64 / 1000.0,
            shutdown_reason,
            total_checks: stats.ticks,
            successful_checks: stats.successful_checks,
        }
    }
}

fn millis_to_utc(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).single().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_from_timestamps() {
        let stats = LoopStats {
            ticks: 4,
            successful_checks: 3,
            ..Default::default()
        };
        let status = RunStatus::new(1_700_000_000_000, 1_700_000_090_500, ShutdownReason::Signal, stats);

        assert!((status.runtime_seconds - 90.5).abs() < f64::EPSILON);
        assert_eq!(status.total_checks, 4);
        assert_eq!(status.successful_checks, 3);
        assert!(status.shutdown_time > status.last_run_time);
    }

    #[test]
    fn test_serializes_reason_in_snake_case() {
        let status = RunStatus::new(0, 1000, ShutdownReason::Normal, LoopStats::default());
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["shutdown_reason"], "normal");
        assert_eq!(json["runtime_seconds"], 1.0);
    }
}
