// Command-line interface
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "login-watchdog")]
#[command(about = "Keeps a desktop chat client logged in", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "WATCHDOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (overrides the configuration file)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Shorthand for --log-level debug
    #[arg(long)]
    pub debug: bool,

    /// Console log format
    #[arg(long, value_enum, env = "WATCHDOG_LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,

    /// Run a single status check, print the result and exit
    #[arg(long)]
    pub once: bool,
}

impl Cli {
    /// Level to log at: --debug wins, then --log-level, then the config value
    pub fn effective_log_level(&self, configured: LogLevel) -> LogLevel {
        if self.debug {
            LogLevel::Debug
        } else {
            self.log_level.unwrap_or(configured)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parse a level name from the configuration file (case-insensitive)
    pub fn parse(value: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(value.trim(), true).ok()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable, colored
    Pretty,
    /// One JSON object per line
    Json,
}
