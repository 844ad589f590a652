//! Login Watchdog - Main Entry Point
//! Keeps a desktop chat client running and logged in

mod cli;
mod logging;
mod settings;
mod signals;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};

// Import workspace crates
use watchdog_core::application::monitor::constants::{
    TITLE_FATAL_ERROR, TITLE_MONITOR_STARTED, TITLE_MONITOR_STOPPED,
};
use watchdog_core::application::{
    shutdown_channel, ClientStatusChecker, LogMaintenanceScheduler, LoginRecoverer, MonitorLoop,
};
use watchdog_core::domain::{ExitReason, RunStatus, ShutdownReason};
use watchdog_core::port::time_provider::SystemTimeProvider;
use watchdog_core::port::{Notifier, SessionDriver, StatusChecker, TimeProvider};
use watchdog_infra_system::run_status_file::RUN_STATUS_FILE;
use watchdog_infra_system::{
    write_run_status, CommandSessionDriver, DesktopNotifier, FsLogRetention, LogNotifier,
    SysinfoProcessInspector,
};

use cli::Cli;
use settings::Settings;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn print_banner() {
    println!(
        "{} {}",
        "login-watchdog".bold().cyan(),
        format!("v{}", VERSION).dimmed()
    );
    println!("{}", "Keeps your chat client logged in. Press Ctrl+C to stop.".dimmed());
}

async fn run(cli: Cli) -> Result<ExitCode> {
    print_banner();

    // 1. Load configuration
    let settings = Settings::load(cli.config.as_deref())?;
    let log_dir = settings.log_dir();

    // 2. Initialize logging
    let level = cli.effective_log_level(settings.log_level());
    let logging = logging::init(level, cli.log_format, &log_dir)?;
    if let Some(reason) = &logging.file_error {
        warn!(reason = %reason, "File logging disabled, console only");
    }

    info!("Login Watchdog v{} starting...", VERSION);

    let config = settings.monitor_config();

    // 3. Setup dependencies (DI wiring)
    let time_provider: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);

    let notifier: Arc<dyn Notifier> = if settings.notification.enabled {
        Arc::new(DesktopNotifier::new(
            settings.notification.app_name.clone(),
            settings.notification_timeout(),
        ))
    } else {
        info!("Desktop notifications disabled");
        Arc::new(LogNotifier)
    };

    let driver: Arc<dyn SessionDriver> = Arc::new(CommandSessionDriver::new(
        settings.session_commands(),
        time_provider.clone(),
    ));

    let checker = Arc::new(ClientStatusChecker::new(
        Arc::new(SysinfoProcessInspector::new()),
        driver.clone(),
        settings.client_settings(),
    ));

    if cli.once {
        return Ok(check_once(checker.as_ref()).await);
    }

    let recoverer = Arc::new(LoginRecoverer::new(driver, notifier.clone()));
    let monitor = MonitorLoop::new(checker, recoverer, notifier.clone(), config);

    // 4. Startup log cleanup
    let maintenance = LogMaintenanceScheduler::new(
        Arc::new(FsLogRetention::new(time_provider.clone())),
        log_dir.clone(),
        settings.retention_days(),
        settings.log.maintenance_interval_hours,
    );

    if let Err(e) = maintenance.run_now().await {
        warn!(error = %e, "Startup log cleanup failed");
    }

    // 5. Shutdown on Ctrl+C / SIGTERM
    let (shutdown_tx, shutdown_rx) = shutdown_channel();

    let signal_task = tokio::spawn(async move {
        match signals::wait_for_shutdown().await {
            Ok(signal) => {
                info!(signal, "Shutdown signal received. Stopping after the current check...");
                shutdown_tx.shutdown();
            }
            Err(e) => error!(error = %e, "Failed to listen for shutdown signals"),
        }
    });

    // 6. Start periodic log maintenance
    let maintenance_handle = tokio::spawn(maintenance.run());

    let started_at = time_provider.now_millis();
    send_notification(
        notifier.as_ref(),
        TITLE_MONITOR_STARTED,
        &format!(
            "Checking every {}s (started {})",
            monitor.config().interval_secs(),
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ),
    )
    .await;

    // 7. Run the monitor loop until cancelled or fatal
    let outcome = monitor.run_with_stats(shutdown_rx).await;

    maintenance_handle.abort();
    signal_task.abort();

    // 8. Persist and report the run
    let ended_at = time_provider.now_millis();
    let shutdown_reason = match &outcome.exit_reason {
        ExitReason::Cancelled => ShutdownReason::Signal,
        ExitReason::FatalError(_) => ShutdownReason::Fatal,
    };
    let status = RunStatus::new(started_at, ended_at, shutdown_reason, outcome.stats);

    let status_path = log_dir.join(RUN_STATUS_FILE);
    if let Err(e) = write_run_status(&status_path, &status).await {
        warn!(path = %status_path.display(), error = %e, "Failed to write run status");
    }

    info!(
        runtime_seconds = status.runtime_seconds,
        total_checks = outcome.stats.ticks,
        successful_checks = outcome.stats.successful_checks,
        recovery_attempts = outcome.stats.recovery_attempts,
        recoveries = outcome.stats.recoveries,
        success_rate = outcome.stats.success_rate(),
        shutdown_reason = %shutdown_reason,
        "Run summary"
    );

    let code = match &outcome.exit_reason {
        ExitReason::Cancelled => {
            send_notification(
                notifier.as_ref(),
                TITLE_MONITOR_STOPPED,
                &format!(
                    "Ran {:.0}s, {} checks, {:.1}% successful",
                    status.runtime_seconds,
                    outcome.stats.ticks,
                    outcome.stats.success_rate()
                ),
            )
            .await;
            ExitCode::SUCCESS
        }
        ExitReason::FatalError(reason) => {
            send_notification(notifier.as_ref(), TITLE_FATAL_ERROR, reason).await;
            ExitCode::FAILURE
        }
    };

    info!("Shutdown complete.");
    drop(logging);

    Ok(code)
}

/// Single status check for `--once`
async fn check_once(checker: &dyn StatusChecker) -> ExitCode {
    match checker.check().await {
        Ok(true) => {
            println!("{}", "Client status: healthy".green().bold());
            ExitCode::SUCCESS
        }
        Ok(false) => {
            println!("{}", "Client status: not logged in".yellow().bold());
            ExitCode::FAILURE
        }
        Err(e) => {
            println!("{} {}", "Client status check failed:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn send_notification(notifier: &dyn Notifier, title: &str, body: &str) {
    if let Err(e) = notifier.notify(title, body).await {
        warn!(title, error = %e, "Failed to send notification");
    }
}
