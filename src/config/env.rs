//! Environment variable overlay.
//!
//! # Naming Convention
//!
//! Given the prefix `DMARC_`, a key is rendered by upper-casing it and
//! replacing `.` with `_`:
//!
//! - `DMARC_IMAP_HOST` → `imap.host`
//! - `DMARC_IMAP_USE_TLS` → `imap.use_tls`
//! - `DMARC_SYNC_ON_STARTUP` → `sync.on_startup`
//!
//! Since `_` separates both the section from the field and words inside a
//! field, names are resolved by exact lookup against the registry's known
//! keys rather than by splitting. The `logging` section also answers to
//! `LOG` (`DMARC_LOG_LEVEL`); the canonical spelling wins when both are set.
//!
//! Values are captured as raw strings; coercion happens in the materializer.
//! A variable that is set but empty is still present: it overrides the file
//! layer with `""`, so `DMARC_IMAP_HOST=` clears the host and then fails
//! validation, and `DMARC_IMAP_PORT=` fails coercion. Unset the variable to
//! fall through to lower layers.

use std::collections::{BTreeMap, HashMap};

use super::defaults::Registry;
use super::key::{ConfigKey, LayerMap, RawValue};

/// Default prefix for application environment variables.
pub const ENV_PREFIX: &str = "DMARC_";

/// Section aliases accepted in environment variable names.
const SECTION_ALIASES: &[(&str, &str)] = &[("log", "logging")];

/// Trait for abstracting over environment variable sources.
///
/// This allows testing without modifying the actual environment.
pub trait EnvSource {
    /// Iterate over all environment variables.
    fn vars(&self) -> Box<dyn Iterator<Item = (String, String)> + '_>;
}

/// Environment source that reads from the actual process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdEnv;

impl EnvSource for StdEnv {
    fn vars(&self) -> Box<dyn Iterator<Item = (String, String)> + '_> {
        // vars_os so a non-UTF-8 variable elsewhere in the environment can't panic
        Box::new(
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        )
    }
}

/// Environment source backed by a map (for testing).
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvSource for MapEnv {
    fn vars(&self) -> Box<dyn Iterator<Item = (String, String)> + '_> {
        Box::new(self.vars.iter().map(|(k, v)| (k.clone(), v.clone())))
    }
}

/// Canonical environment variable name for a key.
pub fn env_var_name(prefix: &str, key: &ConfigKey) -> String {
    format!("{}{}", prefix, key.as_str().replace('.', "_").to_ascii_uppercase())
}

/// Collect every prefixed variable that names a known key.
pub fn load_env(prefix: &str, source: &dyn EnvSource, registry: &Registry) -> LayerMap {
    // lower-cased suffix → (key, is_alias)
    let mut lookup: HashMap<String, (ConfigKey, bool)> = HashMap::new();
    for key in registry.keys() {
        lookup.insert(format!("{}_{}", key.section(), key.field()), (key.clone(), false));
        for (alias, section) in SECTION_ALIASES {
            if key.section() == *section {
                lookup.insert(format!("{}_{}", alias, key.field()), (key.clone(), true));
            }
        }
    }

    let mut matched: Vec<(ConfigKey, bool, String, String)> = Vec::new();
    for (name, value) in source.vars() {
        let Some(suffix) = name.strip_prefix(prefix) else {
            continue;
        };
        match lookup.get(&suffix.to_ascii_lowercase()) {
            Some((key, is_alias)) => matched.push((key.clone(), *is_alias, name, value)),
            None => tracing::debug!("Ignoring unrecognized environment variable {}", name),
        }
    }

    // Aliases first so canonical names overwrite them.
    matched.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.2.cmp(&b.2)));

    let mut layer = LayerMap::new();
    for (key, _, name, value) in matched {
        tracing::debug!("Environment variable {} sets {}", name, key);
        layer.insert(key, RawValue::Str(value));
    }
    layer
}
