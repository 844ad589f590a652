// Command session driver implementation
// reason: tokio::process for async, time-bounded helper invocations
use async_trait::async_trait;
use std::process::{Output, Stdio};
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use watchdog_core::domain::ProbeError;
use watchdog_core::port::{SessionDriver, TimeProvider};

/// Default time allowed for a probe or session helper to answer
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(15);

/// External helper commands, each an argv array
#[derive(Debug, Clone, Default)]
pub struct SessionCommands {
    /// Exit status 0 means logged in
    pub probe: Vec<String>,
    /// Invoked with `--timeout <secs>` appended; exit 0 means the login flow opened
    pub login: Vec<String>,
    /// Prints the number of sessions on stdout
    pub sessions: Vec<String>,
}

/// Session driver delegating to external UI-automation helpers
///
/// The watchdog never automates the client itself: each capability is an
/// argv the user configures (a script around their automation tool).
pub struct CommandSessionDriver {
    commands: SessionCommands,
    time_provider: Arc<dyn TimeProvider>,
    command_timeout: Duration,
}

impl CommandSessionDriver {
    /// Create a new command session driver
    ///
    /// # Arguments
    /// * `commands` - Probe / login / session helper argv arrays
    /// * `time_provider` - Time provider for duration tracking
    ///
    /// # Example
    /// ```ignore
    /// let driver = CommandSessionDriver::new(
    ///     SessionCommands {
    ///         probe: vec!["python".into(), "probe.py".into()],
    ///         ..Default::default()
    ///     },
    ///     Arc::new(SystemTimeProvider),
    /// );
    /// ```
    pub fn new(commands: SessionCommands, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            commands,
            time_provider,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    pub fn with_command_timeout(mut self, command_timeout: Duration) -> Self {
        self.command_timeout = command_timeout;
        self
    }

    /// Spawn a helper and wait for its output within `limit`
    async fn run_helper(
        &self,
        what: &str,
        argv: &[String],
        extra_args: &[String],
        limit: Duration,
    ) -> Result<Output, ProbeError> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| ProbeError::Unavailable(format!("{} command not configured", what)))?;

        let start_time = self.time_provider.now_millis();
        debug!(helper = what, program = %program, args = ?args, "Running helper");

        let child = Command::new(program)
            .args(args)
            .args(extra_args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ProbeError::from_io(&format!("{} command spawn failed", what), &e))?;

        let output = match timeout(limit, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(ProbeError::from_io(&format!("{} command failed", what), &e));
            }
            Err(_) => {
                return Err(ProbeError::Transient(format!(
                    "{} command timed out after {}s",
                    what,
                    limit.as_secs()
                )));
            }
        };

        let duration_ms = self.time_provider.now_millis() - start_time;
        debug!(
            helper = what,
            duration_ms,
            exit_code = ?output.status.code(),
            "Helper completed"
        );

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if !stderr.trim().is_empty() {
                debug!(helper = what, stderr = %stderr.trim(), "Helper reported failure");
            }
        }

        Ok(output)
    }
}

/// Parse the session count printed by the sessions helper
fn parse_session_count(stdout: &[u8]) -> Result<usize, ProbeError> {
    let text = String::from_utf8_lossy(stdout);
    text.trim()
        .parse::<usize>()
        .map_err(|e| ProbeError::Transient(format!("unexpected session count {:?}: {}", text.trim(), e)))
}

#[async_trait]
impl SessionDriver for CommandSessionDriver {
    async fn is_logged_in(&self) -> Result<bool, ProbeError> {
        let output = self
            .run_helper("probe", &self.commands.probe, &[], self.command_timeout)
            .await?;
        Ok(output.status.success())
    }

    async fn trigger_login(&self, timeout_secs: u64) -> Result<bool, ProbeError> {
        let extra = ["--timeout".to_string(), timeout_secs.to_string()];
        let limit = Duration::from_secs(timeout_secs) + self.command_timeout;

        let output = self
            .run_helper("login", &self.commands.login, &extra, limit)
            .await?;

        if output.status.success() {
            info!("Login helper opened the login flow");
            Ok(true)
        } else {
            warn!(exit_code = ?output.status.code(), "Login helper failed");
            Ok(false)
        }
    }

    async fn session_count(&self) -> Result<Option<usize>, ProbeError> {
        if self.commands.sessions.is_empty() {
            return Ok(None);
        }

        let output = self
            .run_helper("sessions", &self.commands.sessions, &[], self.command_timeout)
            .await?;

        if !output.status.success() {
            return Err(ProbeError::Transient(format!(
                "sessions command exited with {:?}",
                output.status.code()
            )));
        }

        parse_session_count(&output.stdout).map(Some)
    }
}
