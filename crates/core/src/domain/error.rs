// Domain Error Types

use thiserror::Error;

/// Failure raised by a status probe, a session driver or a recovery attempt
///
/// Only `ResourceExhausted` is fatal to the monitor loop; everything else is
/// counted as a failed check and retried on the next tick.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("Transient failure: {0}")]
    Transient(String),

    #[error("Capability unavailable: {0}")]
    Unavailable(String),

    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),
}

impl ProbeError {
    /// True when the error should terminate the monitor loop
    pub fn is_fatal(&self) -> bool {
        matches!(self, ProbeError::ResourceExhausted(_))
    }

    /// Classify an I/O error coming out of an adapter
    pub fn from_io(context: &str, err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::OutOfMemory => {
                ProbeError::ResourceExhausted(format!("{context}: {err}"))
            }
            std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
                ProbeError::Unavailable(format!("{context}: {err}"))
            }
            _ => ProbeError::Transient(format!("{context}: {err}")),
        }
    }
}
