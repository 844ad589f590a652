// Retry logic - failure escalation for the monitor loop
use crate::domain::LoopState;
use tracing::{info, warn};

/// What the loop should do after a failed check
#[derive(Debug, PartialEq, Eq)]
pub enum RetryDecision {
    /// Below the threshold: wait for the next tick
    Wait,
    /// Threshold reached: run a recovery attempt now
    Recover,
}

/// Bounded-retry policy
///
/// Counts consecutive failed checks and escalates to recovery when the
/// count reaches `max_retries`:
/// - a successful check or a successful recovery resets the count to 0
/// - a failed recovery leaves the count pinned at the threshold, so the
///   next failed check escalates again immediately
pub struct RetryPolicy {
    max_retries: u32,
}

impl RetryPolicy {
    /// Create a new retry policy
    ///
    /// # Arguments
    /// * `max_retries` - Consecutive failures that trigger recovery (min 1)
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries: max_retries.max(1),
        }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Record a successful status check
    pub fn on_check_success(&self, state: &mut LoopState) {
        if state.consecutive_failures > 0 {
            info!(
                previous_failures = state.consecutive_failures,
                "Status check succeeded, failure counter reset"
            );
        }
        state.consecutive_failures = 0;
        state.successful_checks += 1;
    }

    /// Record a failed status check and decide whether to recover
    ///
    /// The counter saturates at `max_retries`.
    pub fn on_check_failure(&self, state: &mut LoopState) -> RetryDecision {
        state.consecutive_failures = (state.consecutive_failures + 1).min(self.max_retries);

        warn!(
            consecutive_failures = state.consecutive_failures,
            max_retries = self.max_retries,
            "Status check failed"
        );

        if state.consecutive_failures >= self.max_retries {
            RetryDecision::Recover
        } else {
            RetryDecision::Wait
        }
    }

    /// Record the outcome of a recovery attempt
    pub fn on_recovery(&self, state: &mut LoopState, recovered: bool) {
        state.recovery_attempts += 1;
        if recovered {
            state.recoveries += 1;
            state.consecutive_failures = 0;
        } else {
            // Pinned at the threshold: the next failed tick retries recovery
            state.consecutive_failures = self.max_retries;
        }
    }
}
