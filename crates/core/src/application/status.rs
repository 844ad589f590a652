// Client status check - process, login state and session list
use crate::application::monitor::constants::CLIENT_STARTUP_GRACE;
use crate::domain::ProbeError;
use crate::port::{ProcessInspector, SessionDriver, StatusChecker};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// What to watch and how to start it
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub process_name: String,
    pub install_path: Option<PathBuf>,
    pub auto_start: bool,
    pub startup_grace: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            process_name: "WeChat.exe".to_string(),
            install_path: None,
            auto_start: true,
            startup_grace: CLIENT_STARTUP_GRACE,
        }
    }
}

/// StatusChecker combining the process table and the session driver
///
/// Check order:
/// 1. Client process running (auto-start it if configured, report unhealthy)
/// 2. Client logged in
/// 3. Session list not empty (an unreadable list only warns)
pub struct ClientStatusChecker {
    inspector: Arc<dyn ProcessInspector>,
    driver: Arc<dyn SessionDriver>,
    settings: ClientSettings,
}

impl ClientStatusChecker {
    pub fn new(
        inspector: Arc<dyn ProcessInspector>,
        driver: Arc<dyn SessionDriver>,
        settings: ClientSettings,
    ) -> Self {
        Self {
            inspector,
            driver,
            settings,
        }
    }

    async fn start_client(&self) -> Result<(), ProbeError> {
        match (self.settings.auto_start, &self.settings.install_path) {
            (true, Some(path)) => {
                info!(path = %path.display(), "Auto-starting client");
                match self.inspector.start(path).await {
                    Ok(()) => {
                        sleep(self.settings.startup_grace).await;
                        info!("Client startup grace period over");
                    }
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => warn!(error = %e, "Failed to start client"),
                }
            }
            _ => info!("Auto-start not configured, please start the client manually"),
        }
        Ok(())
    }
}

#[async_trait]
impl StatusChecker for ClientStatusChecker {
    async fn check(&self) -> Result<bool, ProbeError> {
        let name = &self.settings.process_name;

        if !self.inspector.is_running(name).await? {
            info!(process = %name, "Client process is not running");
            self.start_client().await?;
            return Ok(false);
        }

        if !self.driver.is_logged_in().await? {
            info!("Client is running but not logged in");
            return Ok(false);
        }

        match self.driver.session_count().await {
            Ok(None) => {
                debug!("Session list check not configured");
                info!("Client online");
                Ok(true)
            }
            Ok(Some(0)) => {
                info!("Session list is empty, login state looks abnormal");
                Ok(false)
            }
            Ok(Some(sessions)) => {
                info!(sessions, "Client online");
                Ok(true)
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!(error = %e, "Could not read session list, assuming online");
                Ok(true)
            }
        }
    }
}
