// Daemon configuration
// Layers: built-in defaults -> optional TOML file -> WATCHDOG__* environment
use anyhow::{bail, Context, Result};
use config::{Config, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use watchdog_core::application::ClientSettings;
use watchdog_core::domain::MonitorConfig;
use watchdog_infra_system::SessionCommands;

use crate::cli::LogLevel;

const ENV_PREFIX: &str = "WATCHDOG";
const ENV_SEPARATOR: &str = "__";
const CONFIG_FILE_NAME: &str = "config.toml";
const MIN_RETENTION_DAYS: i64 = 1;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub monitor: MonitorSection,
    pub log: LogSection,
    pub client: ClientSection,
    pub notification: NotificationSection,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonitorSection {
    // Signed: negative values are clamped to the floors, not rejected
    pub interval_secs: i64,
    pub login_timeout_secs: i64,
    pub max_retries: i64,
    /// Send a "status normal" notification every N healthy checks (0 = never)
    pub success_notify_every: u32,
}

impl Default for MonitorSection {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            login_timeout_secs: 60,
            max_retries: 3,
            success_notify_every: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogSection {
    pub level: String,
    pub dir: String,
    pub retention_days: i64,
    pub maintenance_interval_hours: u64,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "logs".to_string(),
            retention_days: 7,
            maintenance_interval_hours: 24,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientSection {
    pub process_name: String,
    pub install_path: String,
    pub auto_start: bool,
    pub probe_command: Vec<String>,
    pub login_command: Vec<String>,
    pub sessions_command: Vec<String>,
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            process_name: "WeChat.exe".to_string(),
            install_path: String::new(),
            auto_start: true,
            probe_command: Vec::new(),
            login_command: Vec::new(),
            sessions_command: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct NotificationSection {
    pub enabled: bool,
    pub app_name: String,
    pub timeout_secs: u64,
}

impl Default for NotificationSection {
    fn default() -> Self {
        Self {
            enabled: true,
            app_name: "Login Watchdog".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Default config file location (`<config_dir>/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "login-watchdog").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

impl Settings {
    /// Load settings from the given file (required) or the default location (optional)
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_sources(Some((path, true)), ENV_PREFIX),
            None => {
                let default = default_config_path();
                Self::from_sources(default.as_deref().map(|p| (p, false)), ENV_PREFIX)
            }
        }
    }

    fn from_sources(file: Option<(&Path, bool)>, env_prefix: &str) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some((path, required)) = file {
            let path = expand_path(&path.to_string_lossy());
            builder = builder.add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(required),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator(ENV_SEPARATOR)
                .separator(ENV_SEPARATOR)
                .try_parsing(true),
        );

        let settings: Settings = builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values that cannot be clamped into range
    fn validate(&self) -> Result<()> {
        if LogLevel::parse(&self.log.level).is_none() {
            bail!(
                "log.level must be one of debug, info, warn, error (got {:?})",
                self.log.level
            );
        }
        if self.client.process_name.trim().is_empty() {
            bail!("client.process_name must not be empty");
        }
        Ok(())
    }

    pub fn log_level(&self) -> LogLevel {
        LogLevel::parse(&self.log.level).unwrap_or(LogLevel::Info)
    }

    /// Loop configuration (out-of-range values are clamped with a warning)
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig::new(
            saturating_u64(self.monitor.interval_secs),
            saturating_u32(self.monitor.max_retries),
            saturating_u64(self.monitor.login_timeout_secs),
        )
        .with_success_notify_every(self.monitor.success_notify_every)
    }

    pub fn log_dir(&self) -> PathBuf {
        expand_path(&self.log.dir)
    }

    /// Log retention in days (floor: 1, clamped with a warning)
    pub fn retention_days(&self) -> u32 {
        let requested = self.log.retention_days;
        if requested < MIN_RETENTION_DAYS {
            warn!(
                requested,
                floor = MIN_RETENTION_DAYS,
                "Log retention too short, clamping"
            );
        }
        saturating_u32(requested.max(MIN_RETENTION_DAYS))
    }

    pub fn client_settings(&self) -> ClientSettings {
        let install_path = self.client.install_path.trim();
        ClientSettings {
            process_name: self.client.process_name.clone(),
            install_path: (!install_path.is_empty()).then(|| expand_path(install_path)),
            auto_start: self.client.auto_start,
            ..ClientSettings::default()
        }
    }

    pub fn session_commands(&self) -> SessionCommands {
        SessionCommands {
            probe: self.client.probe_command.clone(),
            login: self.client.login_command.clone(),
            sessions: self.client.sessions_command.clone(),
        }
    }

    pub fn notification_timeout(&self) -> Duration {
        Duration::from_secs(self.notification.timeout_secs)
    }
}

/// Negative values become 0 so the config floors apply
fn saturating_u64(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

fn saturating_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults_without_file() {
        let settings = Settings::from_sources(None, "WATCHDOG_TEST_DEFAULTS").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.monitor.interval_secs, 30);
        assert_eq!(settings.monitor.login_timeout_secs, 60);
        assert_eq!(settings.monitor.max_retries, 3);
        assert_eq!(settings.log.retention_days, 7);
        assert_eq!(settings.client.process_name, "WeChat.exe");
        assert!(settings.notification.enabled);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
[monitor]
interval_secs = 45
max_retries = 5

[client]
install_path = "/opt/client/client.exe"
probe_command = ["python", "probe.py"]

[notification]
enabled = false
"#,
        );

        let settings = Settings::from_sources(Some((&path, true)), "WATCHDOG_TEST_FILE").unwrap();

        assert_eq!(settings.monitor.interval_secs, 45);
        assert_eq!(settings.monitor.max_retries, 5);
        assert_eq!(settings.monitor.login_timeout_secs, 60);
        assert!(!settings.notification.enabled);
        assert_eq!(settings.session_commands().probe, vec!["python", "probe.py"]);
        assert_eq!(
            settings.client_settings().install_path,
            Some(PathBuf::from("/opt/client/client.exe"))
        );
    }

    #[test]
    fn test_missing_required_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(Settings::from_sources(Some((&path, true)), "WATCHDOG_TEST_MISSING").is_err());
    }

    #[test]
    fn test_missing_optional_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");
        let settings = Settings::from_sources(Some((&path, false)), "WATCHDOG_TEST_OPTIONAL").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[monitor]\ninterval_secs = 45\n");
        std::env::set_var("WATCHDOG_TEST_ENV__MONITOR__INTERVAL_SECS", "90");

        let settings = Settings::from_sources(Some((&path, true)), "WATCHDOG_TEST_ENV").unwrap();
        assert_eq!(settings.monitor.interval_secs, 90);
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[log]\nlevel = \"chatty\"\n");
        assert!(Settings::from_sources(Some((&path, true)), "WATCHDOG_TEST_LEVEL").is_err());
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "[monitor]\ninterval_secs = 2\nmax_retries = 0\n\n[log]\nretention_days = 0\n",
        );
        let settings = Settings::from_sources(Some((&path, true)), "WATCHDOG_TEST_CLAMP").unwrap();

        let config = settings.monitor_config();
        assert_eq!(config.interval_secs(), 10);
        assert_eq!(config.max_retries(), 1);
        assert_eq!(settings.retention_days(), 1);
    }

    #[test]
    fn test_negative_values_are_clamped_not_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "[monitor]\ninterval_secs = -5\nmax_retries = -1\nlogin_timeout_secs = -30\n\n[log]\nretention_days = -7\n",
        );
        let settings = Settings::from_sources(Some((&path, true)), "WATCHDOG_TEST_NEGATIVE").unwrap();

        let config = settings.monitor_config();
        assert_eq!(config.interval_secs(), 10);
        assert_eq!(config.max_retries(), 1);
        assert_eq!(config.login_timeout_secs(), 1);
        assert_eq!(settings.retention_days(), 1);
    }

    #[test]
    fn test_saturating_conversions() {
        assert_eq!(saturating_u64(-5), 0);
        assert_eq!(saturating_u64(45), 45);
        assert_eq!(saturating_u32(-1), 0);
        assert_eq!(saturating_u32(i64::MAX), u32::MAX);
    }

    #[test]
    fn test_empty_install_path_disables_auto_start_target() {
        let settings = Settings::default();
        assert_eq!(settings.client_settings().install_path, None);
        assert_eq!(settings.log_dir(), PathBuf::from("logs"));
    }
}
