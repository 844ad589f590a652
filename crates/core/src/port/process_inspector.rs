// Process Inspector Port
use crate::domain::ProbeError;
use async_trait::async_trait;
use std::path::Path;

/// Looks up and launches OS processes
#[async_trait]
pub trait ProcessInspector: Send + Sync {
    /// Check if a process with this name is running (case-insensitive)
    async fn is_running(&self, name: &str) -> Result<bool, ProbeError>;

    /// Launch an executable without waiting for it
    ///
    /// # Errors
    /// - `ProbeError::Unavailable` if the executable does not exist
    async fn start(&self, path: &Path) -> Result<(), ProbeError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    /// Mock ProcessInspector with a settable running flag
    pub struct MockProcessInspector {
        running: Arc<Mutex<bool>>,
        started: Arc<Mutex<Vec<PathBuf>>>,
        start_fails: bool,
    }

    impl MockProcessInspector {
        pub fn new(running: bool) -> Self {
            Self {
                running: Arc::new(Mutex::new(running)),
                started: Arc::new(Mutex::new(Vec::new())),
                start_fails: false,
            }
        }

        pub fn failing_start(mut self) -> Self {
            self.start_fails = true;
            self
        }

        pub fn set_running(&self, running: bool) {
            *self.running.lock().unwrap() = running;
        }

        pub fn started(&self) -> Vec<PathBuf> {
            self.started.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProcessInspector for MockProcessInspector {
        async fn is_running(&self, _name: &str) -> Result<bool, ProbeError> {
            Ok(*self.running.lock().unwrap())
        }

        async fn start(&self, path: &Path) -> Result<(), ProbeError> {
            self.started.lock().unwrap().push(path.to_path_buf());
            if self.start_fails {
                return Err(ProbeError::Unavailable(format!(
                    "executable not found: {}",
                    path.display()
                )));
            }
            Ok(())
        }
    }
}
