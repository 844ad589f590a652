// Recoverer Port
use crate::domain::ProbeError;
use async_trait::async_trait;

/// Attempts to restore the monitored client within a deadline
#[async_trait]
pub trait Recoverer: Send + Sync {
    /// Try to bring the client back to a usable state
    ///
    /// # Arguments
    /// * `timeout_secs` - Hard deadline for the attempt
    ///
    /// # Returns
    /// `Ok(true)` as soon as the client is usable again, `Ok(false)` on timeout
    async fn recover(&self, timeout_secs: u64) -> Result<bool, ProbeError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Mock Recoverer replaying scripted outcomes
    pub struct MockRecoverer {
        script: Arc<Mutex<VecDeque<Result<bool, ProbeError>>>>,
        fallback: Result<bool, ProbeError>,
        timeouts: Arc<Mutex<Vec<u64>>>,
    }

    impl MockRecoverer {
        pub fn new(script: Vec<Result<bool, ProbeError>>, fallback: Result<bool, ProbeError>) -> Self {
            Self {
                script: Arc::new(Mutex::new(script.into())),
                fallback,
                timeouts: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn always(recovered: bool) -> Self {
            Self::new(Vec::new(), Ok(recovered))
        }

        pub fn call_count(&self) -> usize {
            self.timeouts.lock().unwrap().len()
        }

        /// Timeouts passed to each `recover` call, in order
        pub fn timeouts(&self) -> Vec<u64> {
            self.timeouts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Recoverer for MockRecoverer {
        async fn recover(&self, timeout_secs: u64) -> Result<bool, ProbeError> {
            self.timeouts.lock().unwrap().push(timeout_secs);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| self.fallback.clone())
        }
    }
}
