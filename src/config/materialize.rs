//! Materializer: turn the merged key space into a typed [`ResolvedConfig`].

use super::defaults::{Registry, ValueKind};
use super::error::ConfigError;
use super::key::{ConfigKey, MergedMap, RawValue};
use crate::domain::{
    DatabaseConfig, ImapConfig, LoggingConfig, ResolvedConfig, SyncConfig, WebConfig,
};

pub fn materialize(registry: &Registry, merged: &MergedMap) -> Result<ResolvedConfig, ConfigError> {
    let m = Materializer { registry, merged };

    Ok(ResolvedConfig {
        imap: ImapConfig {
            host: m.string("imap.host")?,
            port: m.port("imap.port")?,
            username: m.string("imap.username")?,
            password: m.string("imap.password")?,
            folder: m.string("imap.folder")?,
            use_tls: m.boolean("imap.use_tls")?,
        },
        database: DatabaseConfig { path: m.string("database.path")? },
        web: WebConfig { host: m.string("web.host")?, port: m.port("web.port")? },
        sync: SyncConfig {
            interval: m.duration("sync.interval")?,
            on_startup: m.boolean("sync.on_startup")?,
        },
        logging: LoggingConfig {
            level: m.string("logging.level")?,
            format: m.string("logging.format")?,
        },
    })
}

struct Materializer<'a> {
    registry: &'a Registry,
    merged: &'a MergedMap,
}

impl Materializer<'_> {
    /// Raw value for a key, or `None` when no layer set it. Only keys without
    /// a default (the required strings) can come back `None`.
    fn raw(&self, dotted: &str) -> Option<&RawValue> {
        let key = ConfigKey::parse(dotted)?;
        self.merged.get(&key).map(|v| &v.value)
    }

    fn type_error(&self, dotted: &str, raw: &RawValue) -> ConfigError {
        let expected = ConfigKey::parse(dotted)
            .and_then(|key| self.registry.get(&key).map(|spec| spec.kind))
            .unwrap_or(ValueKind::Str)
            .expected();
        ConfigError::Type { key: dotted.to_string(), raw: raw.render(), expected }
    }

    fn missing(&self, dotted: &str) -> ConfigError {
        ConfigError::Type { key: dotted.to_string(), raw: String::new(), expected: "a value" }
    }

    fn string(&self, dotted: &str) -> Result<String, ConfigError> {
        Ok(self.raw(dotted).map(RawValue::render).unwrap_or_default())
    }

    fn port(&self, dotted: &str) -> Result<u16, ConfigError> {
        let raw = self.raw(dotted).ok_or_else(|| self.missing(dotted))?;
        let parsed = match raw {
            RawValue::Int(n) => u16::try_from(*n).ok(),
            RawValue::Str(s) => s.trim().parse::<u16>().ok(),
            RawValue::Bool(_) => None,
        };
        parsed.ok_or_else(|| self.type_error(dotted, raw))
    }

    fn boolean(&self, dotted: &str) -> Result<bool, ConfigError> {
        let raw = self.raw(dotted).ok_or_else(|| self.missing(dotted))?;
        let parsed = match raw {
            RawValue::Bool(b) => Some(*b),
            RawValue::Int(0) => Some(false),
            RawValue::Int(1) => Some(true),
            RawValue::Int(_) => None,
            RawValue::Str(s) => parse_bool(s),
        };
        parsed.ok_or_else(|| self.type_error(dotted, raw))
    }

    fn duration(&self, dotted: &str) -> Result<String, ConfigError> {
        let raw = self.raw(dotted).ok_or_else(|| self.missing(dotted))?;
        let text = raw.render();
        humantime::parse_duration(text.trim()).map_err(|_| self.type_error(dotted, raw))?;
        Ok(text)
    }
}

/// Accepts: 1, true, yes, on (for true)
///          0, false, no, off (for false)
fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "on" => Some(true),
        "0" | "false" | "f" | "no" | "off" => Some(false),
        _ => None,
    }
}
