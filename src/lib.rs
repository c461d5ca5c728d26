//! dmarc-viewer: layered configuration core for the DMARC report viewer
//!
//! Resolves a single validated [`domain::ResolvedConfig`] from built-in
//! defaults, an optional YAML file, `DMARC_*` environment variables and
//! command-line flags, in increasing order of precedence.

pub mod cli;
pub mod config;
pub mod domain;

pub use config::{load_config, ConfigError, ConfigLoader};
pub use domain::ResolvedConfig;
