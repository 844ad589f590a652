// Login recovery - reopen the login flow and wait for the user to finish it
use crate::application::monitor::constants::{
    LOGIN_POLL_INTERVAL, TITLE_LOGIN_REQUIRED, TITLE_LOGIN_SUCCEEDED, TITLE_LOGIN_TIMEOUT,
};
use crate::application::poll::poll_until;
use crate::domain::ProbeError;
use crate::port::{Notifier, Recoverer, SessionDriver};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Recoverer that drives the client's login flow
///
/// Algorithm:
/// 1. Ask the session driver to open the login window
/// 2. Notify the user that a login (QR scan) is required
/// 3. Poll the login state every 2s until logged in or the timeout elapses
/// 4. Notify success or timeout
pub struct LoginRecoverer {
    driver: Arc<dyn SessionDriver>,
    notifier: Arc<dyn Notifier>,
    poll_interval: Duration,
}

impl LoginRecoverer {
    /// Create a new login recoverer
    ///
    /// # Example
    /// ```ignore
    /// let recoverer = LoginRecoverer::new(driver.clone(), notifier.clone());
    /// let recovered = recoverer.recover(60).await?;
    /// ```
    pub fn new(driver: Arc<dyn SessionDriver>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            driver,
            notifier,
            poll_interval: LOGIN_POLL_INTERVAL,
        }
    }

    /// Override the login-state polling interval
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    async fn notify(&self, title: &str, body: &str) {
        if let Err(e) = self.notifier.notify(title, body).await {
            warn!(title, error = %e, "Notification failed");
        }
    }
}

#[async_trait]
impl Recoverer for LoginRecoverer {
    async fn recover(&self, timeout_secs: u64) -> Result<bool, ProbeError> {
        info!(timeout_secs, "Opening login flow");

        if !self.driver.trigger_login(timeout_secs).await? {
            error!("Login window could not be opened");
            return Ok(false);
        }

        info!("Login window open, waiting for the user to scan the QR code");
        self.notify(TITLE_LOGIN_REQUIRED, "Scan the QR code to log in again")
            .await;

        let driver = &self.driver;
        let logged_in = poll_until(
            || async move {
                match driver.is_logged_in().await {
                    Ok(online) => online,
                    Err(e) => {
                        debug!(error = %e, "Login probe failed while waiting");
                        false
                    }
                }
            },
            self.poll_interval,
            Duration::from_secs(timeout_secs),
        )
        .await;

        if logged_in {
            info!("Login completed");
            self.notify(TITLE_LOGIN_SUCCEEDED, "Client is logged in, monitoring continues")
                .await;
        } else {
            warn!(timeout_secs, "Timed out waiting for login");
            self.notify(
                TITLE_LOGIN_TIMEOUT,
                &format!("No login within {}s, will try again", timeout_secs),
            )
            .await;
        }

        Ok(logged_in)
    }
}
