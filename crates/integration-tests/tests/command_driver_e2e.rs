//! Command session driver end-to-end tests
//!
//! Real helper processes (`sh`) with a marker file standing in for the
//! client's login state. Runs on real time: never combine with paused clocks.
#![cfg(unix)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use watchdog_core::application::monitor::constants::{
    TITLE_LOGIN_REQUIRED, TITLE_LOGIN_SUCCEEDED, TITLE_LOGIN_TIMEOUT,
};
use watchdog_core::application::{ClientSettings, ClientStatusChecker, LoginRecoverer};
use watchdog_core::port::notifier::mocks::RecordingNotifier;
use watchdog_core::port::process_inspector::mocks::MockProcessInspector;
use watchdog_core::port::time_provider::SystemTimeProvider;
use watchdog_core::port::{Recoverer, StatusChecker};
use watchdog_infra_system::{CommandSessionDriver, SessionCommands};

fn sh(script: String) -> Vec<String> {
    vec!["sh".to_string(), "-c".to_string(), script, "helper".to_string()]
}

/// Helpers backed by `<dir>/online`: login creates it, probe tests for it
fn marker_commands(dir: &Path, login_script: &str) -> SessionCommands {
    let marker = dir.join("online");
    SessionCommands {
        probe: sh(format!("test -f '{}'", marker.display())),
        login: sh(login_script.replace("{marker}", &marker.display().to_string())),
        sessions: sh("echo 4".to_string()),
    }
}

fn driver(commands: SessionCommands) -> Arc<CommandSessionDriver> {
    Arc::new(
        CommandSessionDriver::new(commands, Arc::new(SystemTimeProvider))
            .with_command_timeout(Duration::from_secs(5)),
    )
}

#[tokio::test]
async fn test_status_reflects_probe_helper() {
    let temp = TempDir::new().unwrap();
    let driver = driver(marker_commands(temp.path(), "exit 0"));
    let checker = ClientStatusChecker::new(
        Arc::new(MockProcessInspector::new(true)),
        driver,
        ClientSettings::default(),
    );

    assert!(!checker.check().await.unwrap());

    std::fs::write(temp.path().join("online"), "").unwrap();
    assert!(checker.check().await.unwrap());
}

#[tokio::test]
async fn test_login_helper_completes_recovery() {
    let temp = TempDir::new().unwrap();
    // Helper receives `--timeout <secs>` as $1 $2 and logs in when asked
    let driver = driver(marker_commands(
        temp.path(),
        "test \"$1\" = --timeout && touch '{marker}'",
    ));
    let notifier = Arc::new(RecordingNotifier::new());
    let recoverer = LoginRecoverer::new(driver, notifier.clone())
        .with_poll_interval(Duration::from_millis(50));

    assert!(recoverer.recover(5).await.unwrap());
    assert!(temp.path().join("online").exists());
    assert_eq!(
        notifier.titles(),
        vec![TITLE_LOGIN_REQUIRED, TITLE_LOGIN_SUCCEEDED]
    );
}

#[tokio::test]
async fn test_login_never_completed_times_out() {
    let temp = TempDir::new().unwrap();
    let driver = driver(marker_commands(temp.path(), "exit 0"));
    let notifier = Arc::new(RecordingNotifier::new());
    let recoverer = LoginRecoverer::new(driver, notifier.clone())
        .with_poll_interval(Duration::from_millis(200));

    assert!(!recoverer.recover(1).await.unwrap());
    assert_eq!(notifier.titles(), vec![TITLE_LOGIN_REQUIRED, TITLE_LOGIN_TIMEOUT]);
}

#[tokio::test]
async fn test_login_helper_failure_skips_polling() {
    let temp = TempDir::new().unwrap();
    let driver = driver(marker_commands(temp.path(), "exit 3"));
    let notifier = Arc::new(RecordingNotifier::new());
    let recoverer = LoginRecoverer::new(driver, notifier.clone());

    assert!(!recoverer.recover(5).await.unwrap());
    assert!(notifier.sent().is_empty());
}
