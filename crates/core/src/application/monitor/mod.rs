// Monitor - status polling loop with bounded retries

pub mod constants;
mod panic_guard;
mod shutdown;

use constants::*;
pub use panic_guard::{execute_guarded, PanicGuardResult};
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};

use crate::application::retry::{RetryDecision, RetryPolicy};
use crate::domain::{ExitReason, LoopOutcome, LoopState, MonitorConfig};
use crate::port::{Notifier, Recoverer, StatusChecker};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Result of one status check as seen by the loop
enum CheckOutcome {
    Healthy,
    Unhealthy,
    Fatal(String),
}

/// Result of one recovery attempt as seen by the loop
enum RecoveryOutcome {
    Recovered,
    Failed,
    Fatal(String),
}

/// Polls a `StatusChecker` every interval and escalates to a `Recoverer`
/// after `max_retries` consecutive failures
///
/// Check and recovery errors (and panics) are absorbed, logged and counted.
/// The loop ends only when shutdown is requested or a port reports
/// resource exhaustion.
pub struct MonitorLoop {
    checker: Arc<dyn StatusChecker>,
    recoverer: Arc<dyn Recoverer>,
    notifier: Arc<dyn Notifier>,
    config: MonitorConfig,
    retry_policy: RetryPolicy,
}

impl MonitorLoop {
    /// Create a new monitor loop
    ///
    /// # Arguments
    /// * `checker` - Status probe called once per tick
    /// * `recoverer` - Recovery capability used at the failure threshold
    /// * `notifier` - Best-effort user notifications
    /// * `config` - Interval, retry limit and login timeout
    pub fn new(
        checker: Arc<dyn StatusChecker>,
        recoverer: Arc<dyn Recoverer>,
        notifier: Arc<dyn Notifier>,
        config: MonitorConfig,
    ) -> Self {
        let retry_policy = RetryPolicy::new(config.max_retries());
        Self {
            checker,
            recoverer,
            notifier,
            config,
            retry_policy,
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Run until cancelled or a fatal error occurs
    pub async fn run(&self, shutdown: ShutdownToken) -> ExitReason {
        self.run_with_stats(shutdown).await.exit_reason
    }

    /// Run until cancelled or a fatal error occurs, returning the counters too
    pub async fn run_with_stats(&self, shutdown: ShutdownToken) -> LoopOutcome {
        info!(
            interval_secs = self.config.interval_secs(),
            max_retries = self.config.max_retries(),
            login_timeout_secs = self.config.login_timeout_secs(),
            "Monitor loop started"
        );

        let mut state = LoopState::default();

        let exit_reason = loop {
            if shutdown.is_shutdown() {
                state.cancelled = true;
                info!(ticks = state.tick_count, "Monitor loop shutting down");
                break ExitReason::Cancelled;
            }

            if let Err(reason) = self.tick(&mut state).await {
                error!(reason = %reason, ticks = state.tick_count, "Monitor loop stopped by fatal error");
                break reason;
            }

            self.cooldown(&shutdown).await;
        };

        let stats = state.stats();
        info!(
            ticks = stats.ticks,
            successful_checks = stats.successful_checks,
            recovery_attempts = stats.recovery_attempts,
            recoveries = stats.recoveries,
            success_rate = stats.success_rate(),
            "Monitor loop stopped"
        );

        LoopOutcome { exit_reason, stats }
    }

    /// Run one tick: check, then escalate if the threshold is reached
    async fn tick(&self, state: &mut LoopState) -> Result<(), ExitReason> {
        state.tick_count += 1;
        debug!(tick = state.tick_count, "Running status check");

        match self.check_once().await {
            CheckOutcome::Healthy => {
                self.retry_policy.on_check_success(state);
                self.after_success(state).await;
            }
            CheckOutcome::Unhealthy => {
                if self.retry_policy.on_check_failure(state) == RetryDecision::Recover {
                    self.attempt_recovery(state).await?;
                }
            }
            CheckOutcome::Fatal(msg) => return Err(ExitReason::FatalError(msg)),
        }

        if state.tick_count % STATS_LOG_EVERY_TICKS == 0 {
            let stats = state.stats();
            info!(
                ticks = stats.ticks,
                successful_checks = stats.successful_checks,
                success_rate = stats.success_rate(),
                "Monitor statistics"
            );
        }

        Ok(())
    }

    /// Call the checker with panic isolation
    async fn check_once(&self) -> CheckOutcome {
        let checker = Arc::clone(&self.checker);

        match execute_guarded(async move { checker.check().await }).await {
            PanicGuardResult::Success(Ok(true)) => CheckOutcome::Healthy,
            PanicGuardResult::Success(Ok(false)) => CheckOutcome::Unhealthy,
            PanicGuardResult::Success(Err(e)) if e.is_fatal() => CheckOutcome::Fatal(e.to_string()),
            PanicGuardResult::Success(Err(e)) => {
                warn!(error = %e, "Status check raised an error, counting as failure");
                CheckOutcome::Unhealthy
            }
            PanicGuardResult::Panicked(msg) => {
                warn!(panic_msg = %msg, "Status check panicked, counting as failure");
                CheckOutcome::Unhealthy
            }
        }
    }

    async fn after_success(&self, state: &LoopState) {
        let every = self.config.success_notify_every();
        if every > 0 && state.tick_count % u64::from(every) == 0 {
            let stats = state.stats();
            self.notify(
                TITLE_STATUS_OK,
                &format!(
                    "{} checks, success rate {:.1}%",
                    stats.ticks,
                    stats.success_rate()
                ),
            )
            .await;
        }
    }

    /// Run one recovery attempt and update the counter
    async fn attempt_recovery(&self, state: &mut LoopState) -> Result<(), ExitReason> {
        let timeout_secs = self.config.login_timeout_secs();
        error!(
            consecutive_failures = state.consecutive_failures,
            timeout_secs, "Failure threshold reached, attempting recovery"
        );
        self.notify(
            TITLE_STATUS_ABNORMAL,
            &format!(
                "{} consecutive failed checks, attempting automatic login",
                state.consecutive_failures
            ),
        )
        .await;

        match self.recover_once(timeout_secs).await {
            RecoveryOutcome::Recovered => {
                self.retry_policy.on_recovery(state, true);
                info!(recoveries = state.recoveries, "Recovery succeeded");
                self.notify(TITLE_RECOVERED, "Automatic login succeeded, monitoring continues")
                    .await;
                Ok(())
            }
            RecoveryOutcome::Failed => {
                self.retry_policy.on_recovery(state, false);
                error!(
                    attempts = state.recovery_attempts,
                    "Recovery failed, retrying on next tick"
                );
                self.notify(
                    TITLE_RECOVERY_FAILED,
                    &format!(
                        "{} consecutive failed checks, automatic login did not succeed. \
                         Will retry on the next check.",
                        state.consecutive_failures
                    ),
                )
                .await;
                Ok(())
            }
            RecoveryOutcome::Fatal(msg) => Err(ExitReason::FatalError(msg)),
        }
    }

    /// Call the recoverer with panic isolation
    async fn recover_once(&self, timeout_secs: u64) -> RecoveryOutcome {
        let recoverer = Arc::clone(&self.recoverer);

        match execute_guarded(async move { recoverer.recover(timeout_secs).await }).await {
            PanicGuardResult::Success(Ok(true)) => RecoveryOutcome::Recovered,
            PanicGuardResult::Success(Ok(false)) => RecoveryOutcome::Failed,
            PanicGuardResult::Success(Err(e)) if e.is_fatal() => {
                RecoveryOutcome::Fatal(e.to_string())
            }
            PanicGuardResult::Success(Err(e)) => {
                warn!(error = %e, "Recovery raised an error");
                RecoveryOutcome::Failed
            }
            PanicGuardResult::Panicked(msg) => {
                warn!(panic_msg = %msg, "Recovery panicked");
                RecoveryOutcome::Failed
            }
        }
    }

    /// Sleep one interval in segments, returning early on shutdown
    ///
    /// Cancellation latency is bounded by one segment.
    async fn cooldown(&self, shutdown: &ShutdownToken) {
        let total = self.config.interval();
        let segment = self.config.sleep_segment();
        let mut slept = Duration::ZERO;

        while slept < total {
            if shutdown.is_shutdown() {
                debug!("Shutdown requested during cooldown");
                return;
            }
            let step = segment.min(total - slept);
            sleep(step).await;
            slept += step;
        }
    }

    async fn notify(&self, title: &str, body: &str) {
        if let Err(e) = self.notifier.notify(title, body).await {
            warn!(title, error = %e, "Notification failed");
        }
    }
}
