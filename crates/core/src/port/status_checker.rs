// Status Checker Port
// reason: async-trait needed for dyn-compatible async ports
use crate::domain::ProbeError;
use async_trait::async_trait;

/// Answers "is the monitored client currently usable"
#[async_trait]
pub trait StatusChecker: Send + Sync {
    /// Run one status check
    ///
    /// # Returns
    /// - `Ok(true)` if the client is running and logged in
    /// - `Ok(false)` if it is not usable right now
    ///
    /// # Errors
    /// Any `ProbeError`; the monitor loop counts it as a failed check unless
    /// it is `ResourceExhausted`.
    async fn check(&self) -> Result<bool, ProbeError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// One scripted answer of the mock checker
    #[derive(Debug, Clone)]
    pub enum MockCheck {
        Healthy,
        Unhealthy,
        Fail(ProbeError),
        /// Panic inside the check (for panic isolation testing)
        Panic(String),
    }

    /// Mock StatusChecker replaying a script, then repeating a fallback
    pub struct MockStatusChecker {
        script: Arc<Mutex<VecDeque<MockCheck>>>,
        fallback: MockCheck,
        call_count: Arc<Mutex<usize>>,
    }

    impl MockStatusChecker {
        pub fn new(script: Vec<MockCheck>, fallback: MockCheck) -> Self {
            Self {
                script: Arc::new(Mutex::new(script.into())),
                fallback,
                call_count: Arc::new(Mutex::new(0)),
            }
        }

        /// Script from plain booleans, then keep answering `fallback`
        pub fn from_results(results: &[bool], fallback: bool) -> Self {
            let to_check = |ok: bool| {
                if ok {
                    MockCheck::Healthy
                } else {
                    MockCheck::Unhealthy
                }
            };
            Self::new(results.iter().copied().map(to_check).collect(), to_check(fallback))
        }

        pub fn always(healthy: bool) -> Self {
            Self::from_results(&[], healthy)
        }

        pub fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl StatusChecker for MockStatusChecker {
        async fn check(&self) -> Result<bool, ProbeError> {
            *self.call_count.lock().unwrap() += 1;

            let step = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| self.fallback.clone());

            match step {
                MockCheck::Healthy => Ok(true),
                MockCheck::Unhealthy => Ok(false),
                MockCheck::Fail(err) => Err(err),
                MockCheck::Panic(msg) => {
                    panic!("{}", msg);
                }
            }
        }
    }
}
