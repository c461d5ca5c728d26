//! Command-line interface for dmarc-viewer
//!
//! Every flag declares a no-op default, and only flags the user actually
//! typed are overlaid on the lower layers. Presence comes from clap's value
//! source, never from comparing a parsed value with its default.

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::Result;
use clap::parser::ValueSource;
use clap::{ArgAction, ArgMatches, CommandFactory, FromArgMatches, Parser};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{
    CliLayer, ConfigError, ConfigFile, ConfigKey, ConfigLoader, LayerMap, PresenceSet, RawValue,
};
use crate::domain::{LogFormat, LogLevel, ResolvedConfig};

mod summary;

pub use summary::{mask_password, render_summary};

/// Default config file, read only if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// DMARC report viewer
#[derive(Parser, Debug)]
#[command(name = "dmarc-viewer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// IMAP server host
    #[arg(long, value_name = "HOST", default_value = "")]
    pub imap_host: String,

    /// IMAP server port
    #[arg(long, value_name = "PORT", default_value_t = 0)]
    pub imap_port: u16,

    /// IMAP username
    #[arg(long, value_name = "USER", default_value = "")]
    pub imap_username: String,

    /// IMAP password
    #[arg(long, value_name = "PASSWORD", default_value = "", hide_default_value = true)]
    pub imap_password: String,

    /// IMAP folder
    #[arg(long, value_name = "FOLDER", default_value = "")]
    pub imap_folder: String,

    /// Use TLS for IMAP connection
    #[arg(
        long,
        value_name = "BOOL",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true"
    )]
    pub imap_use_tls: bool,

    /// Database file path
    #[arg(long = "database", value_name = "PATH", default_value = "")]
    pub database_path: String,

    /// Web server host
    #[arg(long, value_name = "HOST", default_value = "")]
    pub web_host: String,

    /// Web server port
    #[arg(long, value_name = "PORT", default_value_t = 0)]
    pub web_port: u16,

    /// Sync interval (e.g., 15m)
    #[arg(long, value_name = "DURATION", default_value = "")]
    pub sync_interval: String,

    /// Run sync on startup
    #[arg(
        long,
        value_name = "BOOL",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true"
    )]
    pub sync_on_startup: bool,

    /// Log level (debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", default_value = "")]
    pub log_level: String,

    /// Log format (json, text)
    #[arg(long, value_name = "FORMAT", default_value = "")]
    pub log_format: String,
}

/// Flag ids paired with the key each one overlays.
const FLAG_KEYS: &[(&str, &str)] = &[
    ("imap_host", "imap.host"),
    ("imap_port", "imap.port"),
    ("imap_username", "imap.username"),
    ("imap_password", "imap.password"),
    ("imap_folder", "imap.folder"),
    ("imap_use_tls", "imap.use_tls"),
    ("database_path", "database.path"),
    ("web_host", "web.host"),
    ("web_port", "web.port"),
    ("sync_interval", "sync.interval"),
    ("sync_on_startup", "sync.on_startup"),
    ("log_level", "logging.level"),
    ("log_format", "logging.format"),
];

/// Result of parsing argv.
#[derive(Debug, Clone)]
pub struct ParsedFlags {
    pub config: ConfigFile,
    pub layer: CliLayer,
}

/// Parse argv into the CLI layer and its presence set.
pub fn load_flags<I, T>(argv: I) -> Result<ParsedFlags, ConfigError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = Cli::command().try_get_matches_from(argv)?;
    let cli = Cli::from_arg_matches(&matches)?;

    let values = cli.layer_values();
    let present: PresenceSet = FLAG_KEYS
        .iter()
        .filter(|(id, _)| from_command_line(&matches, id))
        .filter_map(|(_, key)| ConfigKey::parse(key))
        .collect();

    let config = if !from_command_line(&matches, "config") {
        ConfigFile::Default(PathBuf::from(&cli.config))
    } else if cli.config.is_empty() {
        ConfigFile::None
    } else {
        ConfigFile::Explicit(PathBuf::from(&cli.config))
    };

    Ok(ParsedFlags { config, layer: CliLayer { values, present } })
}

fn from_command_line(matches: &ArgMatches, id: &str) -> bool {
    matches!(matches.value_source(id), Some(ValueSource::CommandLine))
}

impl Cli {
    /// Every flag's value, explicit or defaulted. The presence set decides
    /// which of these apply.
    fn layer_values(&self) -> LayerMap {
        let entries: [(&str, RawValue); 13] = [
            ("imap.host", self.imap_host.clone().into()),
            ("imap.port", i64::from(self.imap_port).into()),
            ("imap.username", self.imap_username.clone().into()),
            ("imap.password", self.imap_password.clone().into()),
            ("imap.folder", self.imap_folder.clone().into()),
            ("imap.use_tls", self.imap_use_tls.into()),
            ("database.path", self.database_path.clone().into()),
            ("web.host", self.web_host.clone().into()),
            ("web.port", i64::from(self.web_port).into()),
            ("sync.interval", self.sync_interval.clone().into()),
            ("sync.on_startup", self.sync_on_startup.into()),
            ("logging.level", self.log_level.clone().into()),
            ("logging.format", self.log_format.clone().into()),
        ];
        entries
            .into_iter()
            .filter_map(|(key, value)| ConfigKey::parse(key).map(|key| (key, value)))
            .collect()
    }
}

pub fn run() -> Result<()> {
    let flags = match load_flags(std::env::args_os()) {
        Ok(flags) => flags,
        // clap prints usage (or --help/--version) and picks the exit code
        Err(ConfigError::CliParse(e)) => e.exit(),
        Err(e) => return Err(e.into()),
    };

    // Warnings raised while resolving (unknown keys and the like) go through
    // a scoped stderr subscriber; the configured one is only known afterwards.
    let cfg = tracing::subscriber::with_default(bootstrap_subscriber(), || {
        ConfigLoader::new().resolve(&flags.config, &flags.layer)
    })?;
    init_logging(&cfg);

    tracing::info!(
        imap_host = %cfg.imap.host,
        imap_folder = %cfg.imap.folder,
        database = %cfg.database.path,
        web_port = cfg.web.port,
        sync_interval = %cfg.sync.interval,
        "Configuration loaded"
    );

    print!("{}", render_summary(&cfg));
    Ok(())
}

/// Plain stderr subscriber used before the logging section is resolved.
fn bootstrap_subscriber() -> impl tracing::Subscriber + Send + Sync {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(std::io::stderr))
}

/// Install the global subscriber described by the logging section.
///
/// RUST_LOG in the environment always takes precedence over `logging.level`.
fn init_logging(cfg: &ResolvedConfig) {
    let level = cfg.log_level().unwrap_or(LogLevel::Info);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let registry = tracing_subscriber::registry().with(filter);

    let _ = match cfg.log_format() {
        Some(LogFormat::Json) => {
            registry.with(fmt::layer().json().with_writer(std::io::stderr)).try_init()
        }
        _ => registry.with(fmt::layer().with_writer(std::io::stderr)).try_init(),
    };
}
