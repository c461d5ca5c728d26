//! Core domain types shared with the rest of the application.
//!
//! A [`ResolvedConfig`] is produced once at startup by the configuration
//! pipeline and never mutated afterwards.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Fully resolved and validated application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub imap: ImapConfig,
    pub database: DatabaseConfig,
    pub web: WebConfig,
    pub sync: SyncConfig,
    pub logging: LoggingConfig,
}

/// IMAP server connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImapConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub folder: String,
    pub use_tls: bool,
}

/// Report storage settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub path: String,
}

/// Dashboard bind address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

/// Mailbox sync schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Duration string such as `15m` or `1h30m`.
    pub interval: String,
    pub on_startup: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl ResolvedConfig {
    /// Parsed sync interval, or `None` if the text is not a duration.
    ///
    /// Resolved configs always carry a parseable interval; `None` only shows
    /// up for values constructed by hand.
    pub fn sync_interval(&self) -> Option<Duration> {
        humantime::parse_duration(self.sync.interval.trim()).ok()
    }

    /// Log level as a typed value, if recognized.
    pub fn log_level(&self) -> Option<LogLevel> {
        self.logging.level.parse().ok()
    }

    /// Log format as a typed value, if recognized.
    pub fn log_format(&self) -> Option<LogFormat> {
        self.logging.format.parse().ok()
    }
}

/// Accepted values for `logging.level`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
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
}

impl FromStr for LogLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(()),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepted values for `logging.format`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Text,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Json => "json",
            LogFormat::Text => "text",
        }
    }
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(LogFormat::Json),
            "text" => Ok(LogFormat::Text),
            _ => Err(()),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
