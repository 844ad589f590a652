// Notifier implementations
// reason: notify-rust for native toasts, tracing-only fallback when disabled
use async_trait::async_trait;
use notify_rust::{Notification, Timeout};
use std::time::Duration;
use tracing::debug;

use watchdog_core::port::{Notifier, NotifyError};

/// Native desktop notification adapter
///
/// `Notification::show()` is synchronous (and may block on the session bus),
/// so each send runs on tokio's blocking pool.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    app_name: String,
    timeout: Duration,
}

impl DesktopNotifier {
    pub fn new(app_name: impl Into<String>, timeout: Duration) -> Self {
        Self {
            app_name: app_name.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        let title = title.to_string();
        let body = body.to_string();
        let app_name = self.app_name.clone();
        let timeout_ms = u32::try_from(self.timeout.as_millis()).unwrap_or(u32::MAX);

        let sent = tokio::task::spawn_blocking(move || {
            Notification::new()
                .appname(&app_name)
                .summary(&title)
                .body(&body)
                .timeout(Timeout::Milliseconds(timeout_ms))
                .show()
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| NotifyError::SendFailed(format!("notification task failed: {}", e)))?;

        sent.map_err(NotifyError::SendFailed)?;
        debug!("Desktop notification sent");
        Ok(())
    }
}

/// Notifier that only writes to the log
///
/// Used when notifications are disabled in the configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        debug!(%title, %body, "Notification");
        Ok(())
    }
}
