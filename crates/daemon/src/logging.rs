// Logging setup: console (pretty / JSON) + daily rolling file
use anyhow::{anyhow, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{LogFormat, LogLevel};

/// Prefix of the rolling log files (`login-watchdog.log.YYYY-MM-DD`)
pub const LOG_FILE_PREFIX: &str = "login-watchdog.log";

/// Result of logging initialization
///
/// The guard must be held until exit so buffered file lines get flushed.
pub struct LoggingHandle {
    pub guard: Option<WorkerGuard>,
    /// Why the file layer was skipped, if it was
    pub file_error: Option<String>,
}

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over `level`. A log directory that cannot be
/// created disables file logging; console logging always stays on.
pub fn init(level: LogLevel, format: LogFormat, log_dir: &Path) -> Result<LoggingHandle> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.as_str()))
        .map_err(|e| anyhow!("Failed to create env filter: {}", e))?;

    let (file_writer, guard, file_error) = match open_log_file(log_dir) {
        Ok(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    let file_layer = file_writer.map(|writer| fmt::layer().with_writer(writer).with_ansi(false));

    let registry = tracing_subscriber::registry().with(env_filter).with(file_layer);

    match format {
        LogFormat::Json => {
            // Production: JSON structured logging
            registry.with(fmt::layer().json()).try_init()
        }
        LogFormat::Pretty => {
            // Development: Pretty formatting with colors
            registry.with(fmt::layer().pretty()).try_init()
        }
    }
    .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;

    Ok(LoggingHandle { guard, file_error })
}

fn open_log_file(log_dir: &Path) -> std::result::Result<RollingFileAppender, String> {
    std::fs::create_dir_all(log_dir)
        .map_err(|e| format!("cannot create log directory {}: {}", log_dir.display(), e))?;

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .build(log_dir)
        .map_err(|e| format!("cannot open log file in {}: {}", log_dir.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_log_file_creates_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nested").join("logs");
        assert!(open_log_file(&dir).is_ok());
        assert!(dir.is_dir());
    }

    #[test]
    fn test_open_log_file_under_a_file_fails() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        assert!(open_log_file(&blocker.join("logs")).is_err());
    }
}
