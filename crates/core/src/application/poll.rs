// Poll-until: bounded polling with a hard deadline
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Shortest interval accepted by `poll_until`
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Evaluate `predicate` every `interval` until it returns true or `timeout` elapses
///
/// Each round sleeps first (clamped to the time left before the deadline),
/// then evaluates the predicate once. Returns `true` on the first success
/// without evaluating the predicate again; returns `false` once the deadline
/// has passed. A zero timeout returns `false` without evaluating anything.
///
/// # Example
/// ```text
/// let online = poll_until(
///     || async { driver.is_logged_in().await.unwrap_or(false) },
///     Duration::from_secs(2),
///     Duration::from_secs(60),
/// ).await;
/// ```
pub async fn poll_until<F, Fut>(mut predicate: F, interval: Duration, timeout: Duration) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let interval = interval.max(MIN_POLL_INTERVAL);
    let started = Instant::now();
    let deadline = started + timeout;
    let mut attempts: u32 = 0;

    loop {
        let now = Instant::now();
        if now >= deadline {
            debug!(attempts, timeout_secs = timeout.as_secs(), "Poll deadline reached");
            return false;
        }

        sleep(interval.min(deadline - now)).await;
        attempts += 1;

        if predicate().await {
            debug!(
                attempts,
                waited_ms = started.elapsed().as_millis() as u64,
                "Poll predicate satisfied"
            );
            return true;
        }

        debug!(
            attempts,
            waited_secs = started.elapsed().as_secs(),
            timeout_secs = timeout.as_secs(),
            "Still waiting"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_returns_true_on_first_success_and_stops() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let ok = poll_until(
            || {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                async move { n == 3 }
            },
            Duration::from_secs(2),
            Duration::from_secs(60),
        )
        .await;

        assert!(ok);
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        // Nothing keeps polling in the background
        sleep(Duration::from_secs(30)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let started = Instant::now();

        let ok = poll_until(
            || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { false }
            },
            Duration::from_secs(2),
            Duration::from_secs(10),
        )
        .await;

        assert!(!ok);
        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert!(started.elapsed() >= Duration::from_secs(10));
        assert!(started.elapsed() < Duration::from_secs(11));
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_round_is_clamped_to_deadline() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let started = Instant::now();

        let ok = poll_until(
            || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { false }
            },
            Duration::from_secs(4),
            Duration::from_secs(10),
        )
        .await;

        assert!(!ok);
        // Checks at 4s, 8s and 10s
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(started.elapsed() >= Duration::from_secs(10));
        assert!(started.elapsed() < Duration::from_secs(11));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_timeout_never_calls_predicate() {
        let calls = AtomicUsize::new(0);

        let ok = poll_until(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { true }
            },
            Duration::from_secs(2),
            Duration::ZERO,
        )
        .await;

        assert!(!ok);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
