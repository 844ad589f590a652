// Monitor Shutdown Token

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shutdown signal for graceful termination
///
/// Read-only view of a set-once flag; checking it never blocks.
#[derive(Clone)]
pub struct ShutdownToken {
    flag: Arc<AtomicBool>,
}

impl ShutdownToken {
    /// Check if shutdown was requested
    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Shutdown sender
///
/// Safe to trigger from a signal-handling task; setting the flag is the
/// only cross-task write.
#[derive(Clone)]
pub struct ShutdownSender {
    flag: Arc<AtomicBool>,
}

impl ShutdownSender {
    /// Signal shutdown to the monitor
    ///
    /// Returns true only for the call that actually set the flag.
    pub fn shutdown(&self) -> bool {
        !self.flag.swap(true, Ordering::AcqRel)
    }

    /// Another token observing the same flag
    pub fn token(&self) -> ShutdownToken {
        ShutdownToken {
            flag: Arc::clone(&self.flag),
        }
    }
}

/// Create a shutdown channel
pub fn shutdown_channel() -> (ShutdownSender, ShutdownToken) {
    let flag = Arc::new(AtomicBool::new(false));
    (
        ShutdownSender {
            flag: Arc::clone(&flag),
        },
        ShutdownToken { flag },
    )
}
