// Session Driver Port
// Opaque capability wrapping the external UI-automation tooling
use crate::domain::ProbeError;
use async_trait::async_trait;

/// Drives the chat client's login state
#[async_trait]
pub trait SessionDriver: Send + Sync {
    /// Check whether the client reports a logged-in session
    async fn is_logged_in(&self) -> Result<bool, ProbeError>;

    /// Open the login flow (e.g. QR code window)
    ///
    /// # Arguments
    /// * `timeout_secs` - How long the login window may stay open
    ///
    /// # Returns
    /// `Ok(true)` if the login flow was opened, `Ok(false)` if it could not be
    async fn trigger_login(&self, timeout_secs: u64) -> Result<bool, ProbeError>;

    /// Number of conversations visible in the client
    ///
    /// Used as a deeper health check: a logged-in client with no sessions
    /// is treated as an abnormal login state. `Ok(None)` when the driver
    /// has no way to read the session list.
    async fn session_count(&self) -> Result<Option<usize>, ProbeError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug)]
    struct DriverState {
        logged_in: bool,
        /// Flip to logged in after this many probes following a login trigger
        login_after_probes: Option<usize>,
        login_opens: bool,
        sessions: Result<Option<usize>, ProbeError>,
        probe_calls: usize,
        login_calls: usize,
    }

    /// Mock SessionDriver with a settable login state
    pub struct MockSessionDriver {
        state: Arc<Mutex<DriverState>>,
    }

    impl MockSessionDriver {
        pub fn new(logged_in: bool) -> Self {
            Self {
                state: Arc::new(Mutex::new(DriverState {
                    logged_in,
                    login_after_probes: None,
                    login_opens: true,
                    sessions: Ok(Some(3)),
                    probe_calls: 0,
                    login_calls: 0,
                })),
            }
        }

        /// After a login is triggered, report logged in on the Nth probe
        pub fn logs_in_after(self, probes: usize) -> Self {
            self.state.lock().unwrap().login_after_probes = Some(probes);
            self
        }

        /// Make `trigger_login` report that the window could not be opened
        pub fn login_window_fails(self) -> Self {
            self.state.lock().unwrap().login_opens = false;
            self
        }

        pub fn with_sessions(self, sessions: Result<usize, ProbeError>) -> Self {
            self.state.lock().unwrap().sessions = sessions.map(Some);
            self
        }

        /// Report the session list as unreadable by this driver
        pub fn without_session_list(self) -> Self {
            self.state.lock().unwrap().sessions = Ok(None);
            self
        }

        pub fn set_logged_in(&self, logged_in: bool) {
            self.state.lock().unwrap().logged_in = logged_in;
        }

        pub fn probe_calls(&self) -> usize {
            self.state.lock().unwrap().probe_calls
        }

        pub fn login_calls(&self) -> usize {
            self.state.lock().unwrap().login_calls
        }
    }

    #[async_trait]
    impl SessionDriver for MockSessionDriver {
        async fn is_logged_in(&self) -> Result<bool, ProbeError> {
            let mut guard = self.state.lock().unwrap();
            let state = &mut *guard;
            state.probe_calls += 1;
            if state.login_calls > 0 {
                if let Some(remaining) = state.login_after_probes.as_mut() {
                    if *remaining <= 1 {
                        state.logged_in = true;
                        state.login_after_probes = None;
                    } else {
                        *remaining -= 1;
                    }
                }
            }
            Ok(state.logged_in)
        }

        async fn trigger_login(&self, _timeout_secs: u64) -> Result<bool, ProbeError> {
            let mut state = self.state.lock().unwrap();
            state.login_calls += 1;
            Ok(state.login_opens)
        }

        async fn session_count(&self) -> Result<Option<usize>, ProbeError> {
            self.state.lock().unwrap().sessions.clone()
        }
    }
}
