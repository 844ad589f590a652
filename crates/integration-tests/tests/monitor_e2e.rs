//! Monitor loop end-to-end tests
//!
//! Wires the real application services (ClientStatusChecker, LoginRecoverer,
//! MonitorLoop) over mock ports and drives them on paused tokio time.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use watchdog_core::application::monitor::constants::{
    TITLE_LOGIN_REQUIRED, TITLE_LOGIN_SUCCEEDED, TITLE_LOGIN_TIMEOUT, TITLE_RECOVERED,
    TITLE_RECOVERY_FAILED, TITLE_STATUS_ABNORMAL, TITLE_STATUS_OK,
};
use watchdog_core::application::{
    shutdown_channel, ClientSettings, ClientStatusChecker, LoginRecoverer, MonitorLoop,
};
use watchdog_core::domain::{ExitReason, LoopOutcome, MonitorConfig, ProbeError};
use watchdog_core::port::notifier::mocks::RecordingNotifier;
use watchdog_core::port::process_inspector::mocks::MockProcessInspector;
use watchdog_core::port::session_driver::mocks::MockSessionDriver;

struct Watchdog {
    inspector: Arc<MockProcessInspector>,
    driver: Arc<MockSessionDriver>,
    notifier: Arc<RecordingNotifier>,
    monitor: Arc<MonitorLoop>,
}

fn watchdog(
    inspector: MockProcessInspector,
    driver: MockSessionDriver,
    install_path: Option<&str>,
    config: MonitorConfig,
) -> Watchdog {
    let inspector = Arc::new(inspector);
    let driver = Arc::new(driver);
    let notifier = Arc::new(RecordingNotifier::new());

    let checker = Arc::new(ClientStatusChecker::new(
        inspector.clone(),
        driver.clone(),
        ClientSettings {
            install_path: install_path.map(PathBuf::from),
            ..ClientSettings::default()
        },
    ));
    let recoverer = Arc::new(LoginRecoverer::new(driver.clone(), notifier.clone()));
    let monitor = Arc::new(MonitorLoop::new(checker, recoverer, notifier.clone(), config));

    Watchdog {
        inspector,
        driver,
        notifier,
        monitor,
    }
}

/// Run the loop and request shutdown after `cancel_after`
async fn run_for(monitor: Arc<MonitorLoop>, cancel_after: Duration) -> LoopOutcome {
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let handle = tokio::spawn(async move { monitor.run_with_stats(shutdown_rx).await });

    tokio::time::sleep(cancel_after).await;
    shutdown_tx.shutdown();

    handle.await.unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_logged_out_client_is_recovered_by_login_flow() {
    // Checks at 0s and 10s fail, recovery logs in after two 2s polls (14s),
    // the check at 24s is healthy, shutdown lands in the following cooldown.
    let w = watchdog(
        MockProcessInspector::new(true),
        MockSessionDriver::new(false).logs_in_after(2),
        None,
        MonitorConfig::new(10, 2, 10),
    );

    let outcome = run_for(w.monitor.clone(), Duration::from_secs(31)).await;

    assert_eq!(outcome.exit_reason, ExitReason::Cancelled);
    assert_eq!(outcome.stats.ticks, 3);
    assert_eq!(outcome.stats.successful_checks, 1);
    assert_eq!(outcome.stats.recovery_attempts, 1);
    assert_eq!(outcome.stats.recoveries, 1);
    assert_eq!(w.driver.login_calls(), 1);
    assert_eq!(
        w.notifier.titles(),
        vec![
            TITLE_STATUS_ABNORMAL,
            TITLE_LOGIN_REQUIRED,
            TITLE_LOGIN_SUCCEEDED,
            TITLE_RECOVERED
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_missing_client_is_restarted_and_login_retried() {
    // Each tick: auto-start (5s grace) then a 10s login wait that times out.
    // Shutdown at 27s lands during the second tick, which is allowed to finish.
    let w = watchdog(
        MockProcessInspector::new(false),
        MockSessionDriver::new(false),
        Some("/opt/client/client.exe"),
        MonitorConfig::new(10, 1, 10),
    );

    let outcome = run_for(w.monitor.clone(), Duration::from_secs(27)).await;

    assert_eq!(outcome.exit_reason, ExitReason::Cancelled);
    assert_eq!(outcome.stats.ticks, 2);
    assert_eq!(outcome.stats.successful_checks, 0);
    assert_eq!(outcome.stats.recovery_attempts, 2);
    assert_eq!(outcome.stats.recoveries, 0);
    assert_eq!(w.inspector.started().len(), 2);
    assert_eq!(w.driver.login_calls(), 2);
    assert_eq!(w.notifier.count_titled(TITLE_LOGIN_TIMEOUT), 2);
    assert_eq!(w.notifier.count_titled(TITLE_RECOVERY_FAILED), 2);
    assert_eq!(w.notifier.count_titled(TITLE_STATUS_ABNORMAL), 2);
}

#[tokio::test(start_paused = true)]
async fn test_client_coming_back_resets_failures() {
    let w = watchdog(
        MockProcessInspector::new(true),
        MockSessionDriver::new(false),
        None,
        MonitorConfig::new(10, 3, 10).with_success_notify_every(2),
    );

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let monitor = w.monitor.clone();
    let handle = tokio::spawn(async move { monitor.run_with_stats(shutdown_rx).await });

    // Two failed checks (0s, 10s), then the user logs in manually
    tokio::time::sleep(Duration::from_secs(15)).await;
    w.driver.set_logged_in(true);

    // Healthy checks at 20s and 30s
    tokio::time::sleep(Duration::from_secs(20)).await;
    shutdown_tx.shutdown();
    let outcome = handle.await.unwrap();

    assert_eq!(outcome.exit_reason, ExitReason::Cancelled);
    assert_eq!(outcome.stats.ticks, 4);
    assert_eq!(outcome.stats.successful_checks, 2);
    assert_eq!(outcome.stats.recovery_attempts, 0);
    assert_eq!(w.driver.login_calls(), 0);
    // Ticks 2 and 4 are multiples of two, only tick 4 was healthy
    assert_eq!(w.notifier.titles(), vec![TITLE_STATUS_OK]);
}

#[tokio::test(start_paused = true)]
async fn test_resource_exhaustion_stops_the_watchdog() {
    let w = watchdog(
        MockProcessInspector::new(true),
        MockSessionDriver::new(true)
            .with_sessions(Err(ProbeError::ResourceExhausted("out of handles".into()))),
        None,
        MonitorConfig::new(10, 3, 10),
    );

    let (_shutdown_tx, shutdown_rx) = shutdown_channel();
    let outcome = w.monitor.run_with_stats(shutdown_rx).await;

    assert!(matches!(outcome.exit_reason, ExitReason::FatalError(ref msg) if msg.contains("out of handles")));
    assert_eq!(outcome.stats.ticks, 1);
    assert!(w.notifier.sent().is_empty());
}
