// Notifier Port
use async_trait::async_trait;
use thiserror::Error;

/// Errors from notify operations
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Sink for user-facing notifications
///
/// Best effort: callers log failures and never propagate them.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send a notification with a title and message body
    async fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock Notifier recording every call
    #[derive(Default)]
    pub struct RecordingNotifier {
        sent: Arc<Mutex<Vec<(String, String)>>>,
        fail: bool,
    }

    impl RecordingNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        /// Records calls but reports every send as failed
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn sent(&self) -> Vec<(String, String)> {
            self.sent.lock().unwrap().clone()
        }

        pub fn titles(&self) -> Vec<String> {
            self.sent().into_iter().map(|(title, _)| title).collect()
        }

        pub fn count_titled(&self, title: &str) -> usize {
            self.sent().iter().filter(|(t, _)| t == title).count()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
            self.sent
                .lock()
                .unwrap()
                .push((title.to_string(), body.to_string()));
            if self.fail {
                return Err(NotifyError::SendFailed("mock notifier offline".to_string()));
            }
            Ok(())
        }
    }
}
