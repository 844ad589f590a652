// Panic isolation for monitor safety
use std::any::Any;
use std::future::Future;
use tracing::error;

/// Result of a panic-guarded execution
#[derive(Debug)]
pub enum PanicGuardResult<T> {
    /// Execution completed (successfully or with an error value)
    Success(T),
    /// Execution panicked or was aborted
    Panicked(String),
}

/// Run a future on its own task so a panic inside it cannot kill the monitor
///
/// The future is awaited immediately; the spawn only turns a panic into a
/// `JoinError` that can be reported as a failed call.
///
/// # Example
/// ```text
/// let checker = Arc::clone(&self.checker);
/// match execute_guarded(async move { checker.check().await }).await {
///     PanicGuardResult::Success(result) => { /* ... */ }
///     PanicGuardResult::Panicked(msg) => { /* count as failure */ }
/// }
/// ```
pub async fn execute_guarded<F, T>(future: F) -> PanicGuardResult<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn(future).await {
        Ok(value) => PanicGuardResult::Success(value),
        Err(join_err) => {
            let panic_msg = if join_err.is_panic() {
                panic_message(join_err.into_panic())
            } else {
                "task cancelled".to_string()
            };

            error!(panic_msg = %panic_msg, "Monitored call panicked");
            PanicGuardResult::Panicked(panic_msg)
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
