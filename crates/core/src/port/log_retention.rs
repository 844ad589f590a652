// Log Retention port
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Outcome of one purge pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeStats {
    pub deleted_files: usize,
    pub freed_bytes: u64,
}

impl PurgeStats {
    pub fn freed_mb(&self) -> f64 {
        self.freed_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Deletes log files past their retention period
#[async_trait]
pub trait LogRetention: Send + Sync {
    /// Delete log files in `dir` last modified more than `retention_days` ago
    ///
    /// A missing directory is not an error (nothing to purge).
    ///
    /// # Returns
    /// Number of files deleted and bytes freed
    async fn purge_older_than(&self, dir: &Path, retention_days: u32) -> Result<PurgeStats>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    /// Mock LogRetention recording each purge request
    #[derive(Default)]
    pub struct MockLogRetention {
        calls: Arc<Mutex<Vec<(PathBuf, u32)>>>,
    }

    impl MockLogRetention {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> Vec<(PathBuf, u32)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LogRetention for MockLogRetention {
        async fn purge_older_than(&self, dir: &Path, retention_days: u32) -> Result<PurgeStats> {
            self.calls
                .lock()
                .unwrap()
                .push((dir.to_path_buf(), retention_days));
            Ok(PurgeStats {
                deleted_files: 1,
                freed_bytes: 1024,
            })
        }
    }
}
