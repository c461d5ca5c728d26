//! Configuration loading and merging
//!
//! Handles loading from config files, environment variables, and CLI arguments
//! with proper precedence (CLI > Env > File > Defaults), then materializes and
//! validates the result.

pub mod defaults;
pub mod env;
pub mod error;
pub mod key;
pub mod loader;
pub mod materialize;
pub mod merge;
pub mod validate;

use std::path::{Path, PathBuf};

pub use defaults::{register_defaults, Registry, ValueKind};
pub use env::{load_env, EnvSource, MapEnv, StdEnv, ENV_PREFIX};
pub use error::{ConfigError, ConfigErrorKind, ValidationError};
pub use key::{ConfigKey, Layer, LayerMap, LayeredValue, MergedMap, RawValue};
pub use loader::{load_default_file, load_file};
pub use materialize::materialize;
pub use merge::{merge, CliLayer, PresenceSet};
pub use validate::validate;

use crate::domain::ResolvedConfig;

/// Where the config file layer comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigFile {
    /// No file layer.
    None,
    /// Path the user asked for; it must exist.
    Explicit(PathBuf),
    /// Conventional location; skipped when missing.
    Default(PathBuf),
}

/// One resolution run. Owns its registry and environment source, so separate
/// loaders never share state.
pub struct ConfigLoader {
    registry: Registry,
    env_prefix: String,
    env: Box<dyn EnvSource>,
}

impl ConfigLoader {
    /// Loader reading the process environment under `DMARC_`.
    pub fn new() -> Self {
        Self { registry: Registry::new(), env_prefix: ENV_PREFIX.to_string(), env: Box::new(StdEnv) }
    }

    pub fn with_env(mut self, env: impl EnvSource + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Defaults, file and environment, without a CLI layer.
    pub fn load(&self, path: &Path) -> Result<ResolvedConfig, ConfigError> {
        self.resolve(&ConfigFile::Explicit(path.to_path_buf()), &CliLayer::default())
    }

    /// Run the full pipeline.
    pub fn resolve(&self, file: &ConfigFile, cli: &CliLayer) -> Result<ResolvedConfig, ConfigError> {
        let defaults = self.registry.defaults();
        let file_layer = match file {
            ConfigFile::None => LayerMap::new(),
            ConfigFile::Explicit(path) => load_file(path, &self.registry)?,
            ConfigFile::Default(path) => load_default_file(path, &self.registry)?,
        };
        let env_layer = load_env(&self.env_prefix, self.env.as_ref(), &self.registry);

        let merged = merge(&self.registry, &defaults, &file_layer, &env_layer, cli);
        let cfg = materialize(&self.registry, &merged)?;
        validate(&cfg)?;

        tracing::debug!(
            file_keys = file_layer.len(),
            env_keys = env_layer.len(),
            cli_keys = cli.present.len(),
            "Configuration resolved"
        );
        Ok(cfg)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve configuration from a file and the process environment.
pub fn load_config(path: &Path) -> Result<ResolvedConfig, ConfigError> {
    ConfigLoader::new().load(path)
}
