//! Defaults registry: every known key, its value kind, and its baseline value.
//!
//! Required IMAP credentials deliberately carry no default so that their
//! absence surfaces as a validation error.

use super::key::{ConfigKey, LayerMap, RawValue};

/// Destination type of a key, consulted by the materializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Str,
    Port,
    Bool,
    Duration,
}

impl ValueKind {
    pub fn expected(&self) -> &'static str {
        match self {
            ValueKind::Str => "string",
            ValueKind::Port => "port number",
            ValueKind::Bool => "boolean",
            ValueKind::Duration => "duration",
        }
    }
}

#[derive(Debug, Clone)]
pub struct KeySpec {
    pub key: ConfigKey,
    pub kind: ValueKind,
    pub default: Option<RawValue>,
}

/// Known keys for one resolution run.
///
/// Built fresh by each pipeline invocation; nothing here is process-global.
#[derive(Debug, Clone)]
pub struct Registry {
    specs: Vec<KeySpec>,
}

impl Registry {
    pub fn new() -> Self {
        let mut registry = Self { specs: Vec::new() };

        registry.register("imap.host", ValueKind::Str, None);
        registry.register("imap.port", ValueKind::Port, Some(RawValue::Int(993)));
        registry.register("imap.username", ValueKind::Str, None);
        registry.register("imap.password", ValueKind::Str, None);
        registry.register("imap.folder", ValueKind::Str, Some("INBOX".into()));
        registry.register("imap.use_tls", ValueKind::Bool, Some(RawValue::Bool(true)));

        registry.register("database.path", ValueKind::Str, Some("./dmarc-reports.db".into()));

        registry.register("web.host", ValueKind::Str, Some("localhost".into()));
        registry.register("web.port", ValueKind::Port, Some(RawValue::Int(8080)));

        registry.register("sync.interval", ValueKind::Duration, Some("15m".into()));
        registry.register("sync.on_startup", ValueKind::Bool, Some(RawValue::Bool(true)));

        registry.register("logging.level", ValueKind::Str, Some("info".into()));
        registry.register("logging.format", ValueKind::Str, Some("text".into()));

        registry
    }

    fn register(&mut self, dotted: &str, kind: ValueKind, default: Option<RawValue>) {
        let Some(key) = ConfigKey::parse(dotted) else {
            return;
        };
        if self.specs.iter().any(|spec| spec.key == key) {
            return;
        }
        self.specs.push(KeySpec { key, kind, default });
    }

    pub fn specs(&self) -> &[KeySpec] {
        &self.specs
    }

    pub fn keys(&self) -> impl Iterator<Item = &ConfigKey> {
        self.specs.iter().map(|spec| &spec.key)
    }

    pub fn get(&self, key: &ConfigKey) -> Option<&KeySpec> {
        self.specs.iter().find(|spec| &spec.key == key)
    }

    pub fn contains(&self, key: &ConfigKey) -> bool {
        self.get(key).is_some()
    }

    /// Whether any known key lives under `section` (case-insensitive).
    pub fn has_section(&self, section: &str) -> bool {
        self.specs.iter().any(|spec| spec.key.section().eq_ignore_ascii_case(section))
    }

    /// Baseline layer: one entry per key that has a default.
    pub fn defaults(&self) -> LayerMap {
        self.specs
            .iter()
            .filter_map(|spec| spec.default.clone().map(|value| (spec.key.clone(), value)))
            .collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Baseline values for every optional setting.
pub fn register_defaults() -> LayerMap {
    Registry::new().defaults()
}
