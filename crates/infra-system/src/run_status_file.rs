// Run status persistence (logs/last_run_status.json)
use std::path::Path;
use tracing::debug;

use watchdog_core::domain::RunStatus;
use watchdog_core::error::Result;

/// File name of the run summary inside the log directory
pub const RUN_STATUS_FILE: &str = "last_run_status.json";

/// Write the run summary as pretty JSON, creating the parent directory
pub async fn write_run_status(path: &Path, status: &RunStatus) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let json = serde_json::to_string_pretty(status)?;
    tokio::fs::write(path, json).await?;

    debug!(path = %path.display(), "Run status written");
    Ok(())
}

/// Read a previously written run summary
pub async fn read_run_status(path: &Path) -> Result<RunStatus> {
    let json = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&json)?)
}
