// Filesystem Log Retention Implementation
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::UNIX_EPOCH;
use tracing::{debug, info, warn};

use watchdog_core::error::Result;
use watchdog_core::port::{LogRetention, PurgeStats, TimeProvider};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Marker every purgeable file name contains (`app.log`, `app.log.2024-01-01`)
const LOG_NAME_MARKER: &str = ".log";

/// Deletes aged log files from a directory by modification time
pub struct FsLogRetention {
    time_provider: Arc<dyn TimeProvider>,
}

impl FsLogRetention {
    pub fn new(time_provider: Arc<dyn TimeProvider>) -> Self {
        Self { time_provider }
    }
}

fn is_log_file(name: &str) -> bool {
    name.contains(LOG_NAME_MARKER)
}

#[async_trait]
impl LogRetention for FsLogRetention {
    async fn purge_older_than(&self, dir: &Path, retention_days: u32) -> Result<PurgeStats> {
        let now = self.time_provider.now_millis();
        let cutoff_time = now - i64::from(retention_days) * MILLIS_PER_DAY;

        info!(
            dir = %dir.display(),
            retention_days,
            cutoff_time,
            "Running log retention"
        );

        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(dir = %dir.display(), "Log directory missing, nothing to purge");
                return Ok(PurgeStats::default());
            }
            Err(e) => return Err(e.into()),
        };

        let mut stats = PurgeStats::default();

        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if !is_log_file(name) {
                continue;
            }

            let metadata = match entry.metadata().await {
                Ok(metadata) if metadata.is_file() => metadata,
                Ok(_) => continue,
                Err(e) => {
                    warn!(file = name, error = %e, "Failed to stat log file");
                    continue;
                }
            };

            let modified_ms = match metadata.modified() {
                Ok(modified) => modified
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_millis() as i64)
                    .unwrap_or(0),
                Err(e) => {
                    warn!(file = name, error = %e, "Modification time unavailable");
                    continue;
                }
            };

            if modified_ms >= cutoff_time {
                continue;
            }

            let path = entry.path();
            match tokio::fs::remove_file(&path).await {
                Ok(_) => {
                    stats.deleted_files += 1;
                    stats.freed_bytes += metadata.len();
                    info!(path = %path.display(), "Deleted expired log file");
                }
                Err(e) => {
                    // Not critical - may still be held open by another process
                    warn!(path = %path.display(), error = %e, "Failed to delete log file");
                }
            }
        }

        info!(
            deleted_files = stats.deleted_files,
            freed_mb = stats.freed_mb(),
            "Log retention completed"
        );

        Ok(stats)
    }
}
