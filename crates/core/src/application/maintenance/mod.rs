// Maintenance Service
// Scheduled log retention cleanup

use crate::error::Result;
use crate::port::{LogRetention, PurgeStats};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant};
use tracing::{error, info, warn};

/// Shortest allowed maintenance interval (hours)
const MIN_INTERVAL_HOURS: u64 = 1;

/// Log maintenance scheduler
///
/// Runs periodic log retention in the background
pub struct LogMaintenanceScheduler {
    retention: Arc<dyn LogRetention>,
    log_dir: PathBuf,
    retention_days: u32,
    interval_hours: u64,
}

impl LogMaintenanceScheduler {
    /// Create a new maintenance scheduler
    ///
    /// # Arguments
    /// * `retention` - LogRetention implementation
    /// * `log_dir` - Directory holding the log files
    /// * `retention_days` - Keep files modified within this many days
    /// * `interval_hours` - How often to run maintenance (hours, min 1)
    pub fn new(
        retention: Arc<dyn LogRetention>,
        log_dir: impl Into<PathBuf>,
        retention_days: u32,
        interval_hours: u64,
    ) -> Self {
        let interval_hours = if interval_hours < MIN_INTERVAL_HOURS {
            warn!(
                requested = interval_hours,
                floor = MIN_INTERVAL_HOURS,
                "Maintenance interval too short, clamping"
            );
            MIN_INTERVAL_HOURS
        } else {
            interval_hours
        };

        Self {
            retention,
            log_dir: log_dir.into(),
            retention_days,
            interval_hours,
        }
    }

    /// Run maintenance loop (background task)
    ///
    /// The first pass happens one interval after start; call `run_now`
    /// for the startup cleanup. Should be spawned in tokio::spawn and
    /// aborted on shutdown.
    pub async fn run(self) {
        info!(
            interval_hours = self.interval_hours,
            retention_days = self.retention_days,
            log_dir = %self.log_dir.display(),
            "Log maintenance scheduler started"
        );

        let period = Duration::from_secs(self.interval_hours * 3600);
        let mut tick = interval_at(Instant::now() + period, period);

        loop {
            tick.tick().await;

            info!("Running scheduled log maintenance...");

            if let Err(e) = self.run_now().await {
                error!(error = ?e, "Scheduled log maintenance failed");
            }
        }
    }

    /// Run maintenance immediately (startup cleanup or manual trigger)
    pub async fn run_now(&self) -> Result<PurgeStats> {
        let stats = self
            .retention
            .purge_older_than(&self.log_dir, self.retention_days)
            .await?;

        if stats.deleted_files > 0 {
            info!(
                deleted_files = stats.deleted_files,
                freed_mb = stats.freed_mb(),
                "Log maintenance completed"
            );
        } else {
            info!("Log maintenance completed, no expired log files");
        }

        Ok(stats)
    }
}
