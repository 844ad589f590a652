// Process inspector implementation
// reason: sysinfo for cross-platform process enumeration
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use sysinfo::System;
use tokio::process::Command;
use tracing::{debug, info};

use watchdog_core::domain::ProbeError;
use watchdog_core::port::ProcessInspector;

/// Process inspector implementation using sysinfo
pub struct SysinfoProcessInspector {
    system: Arc<Mutex<System>>,
}

impl SysinfoProcessInspector {
    /// Create a new process inspector
    ///
    /// # Example
    /// ```ignore
    /// let inspector = SysinfoProcessInspector::new();
    /// let running = inspector.is_running("WeChat.exe").await?;
    /// ```
    pub fn new() -> Self {
        Self {
            system: Arc::new(Mutex::new(System::new())),
        }
    }
}

impl Default for SysinfoProcessInspector {
    fn default() -> Self {
        Self::new()
    }
}

/// Case-insensitive process name comparison
fn matches_process_name(candidate: &str, wanted: &str) -> bool {
    candidate.eq_ignore_ascii_case(wanted)
}

#[async_trait]
impl ProcessInspector for SysinfoProcessInspector {
    async fn is_running(&self, name: &str) -> Result<bool, ProbeError> {
        let mut sys = self
            .system
            .lock()
            .map_err(|_| ProbeError::Transient("process table lock poisoned".to_string()))?;

        // Refresh the process list only; CPU/memory are not needed here
        sys.refresh_processes();

        let running = sys
            .processes()
            .values()
            .any(|process| matches_process_name(process.name(), name));

        debug!(process = %name, running, "Process lookup completed");

        Ok(running)
    }

    async fn start(&self, path: &Path) -> Result<(), ProbeError> {
        if !path.exists() {
            return Err(ProbeError::Unavailable(format!(
                "executable not found: {}",
                path.display()
            )));
        }

        let child = Command::new(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ProbeError::from_io("failed to start process", &e))?;

        info!(path = %path.display(), pid = ?child.id(), "Process started in background");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_match_ignores_case() {
        assert!(matches_process_name("wechat.exe", "WeChat.exe"));
        assert!(matches_process_name("WECHAT.EXE", "WeChat.exe"));
        assert!(!matches_process_name("WeChatApp.exe", "WeChat.exe"));
    }

    #[tokio::test]
    async fn test_unknown_process_is_not_running() {
        let inspector = SysinfoProcessInspector::new();
        let running = inspector
            .is_running("no-such-process-for-watchdog-tests")
            .await
            .unwrap();
        assert!(!running);
    }

    #[tokio::test]
    async fn test_start_missing_executable() {
        let inspector = SysinfoProcessInspector::new();
        let result = inspector
            .start(Path::new("/definitely/not/here/client.exe"))
            .await;
        assert!(matches!(result, Err(ProbeError::Unavailable(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_start_existing_executable() {
        let inspector = SysinfoProcessInspector::new();
        inspector.start(Path::new("/bin/sh")).await.unwrap();
    }
}
