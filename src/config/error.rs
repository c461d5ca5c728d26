//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors. All of them abort resolution.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    // NOTE: clap renders its own usage block, so no prefix here
    #[error("{0}")]
    CliParse(#[from] clap::Error),

    #[error("failed to materialize config: {key}: cannot parse '{raw}' as {expected}")]
    Type {
        key: String,
        raw: String,
        expected: &'static str,
    },

    #[error("config validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// Error category, for callers that branch on the taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    Io,
    Parse,
    CliParse,
    Type,
    Validation,
}

impl ConfigError {
    pub fn kind(&self) -> ConfigErrorKind {
        match self {
            ConfigError::Io { .. } => ConfigErrorKind::Io,
            ConfigError::Parse { .. } => ConfigErrorKind::Parse,
            ConfigError::CliParse(_) => ConfigErrorKind::CliParse,
            ConfigError::Type { .. } => ConfigErrorKind::Type,
            ConfigError::Validation(_) => ConfigErrorKind::Validation,
        }
    }
}

/// A semantically invalid resolved value. The message text is stable and
/// shown to operators verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_is_wrapped_with_context() {
        let err = ConfigError::from(ValidationError::new("imap.host is required"));
        assert_eq!(err.to_string(), "config validation failed: imap.host is required");
        assert_eq!(err.kind(), ConfigErrorKind::Validation);
    }

    #[test]
    fn test_type_error_names_key_and_raw_value() {
        let err = ConfigError::Type {
            key: "imap.port".to_string(),
            raw: "notanumber".to_string(),
            expected: "port number",
        };
        let msg = err.to_string();
        assert!(msg.contains("imap.port"));
        assert!(msg.contains("'notanumber'"));
    }

    #[test]
    fn test_io_error_includes_underlying_cause() {
        let err = ConfigError::Io {
            path: PathBuf::from("conf/viewer.yaml"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert_eq!(err.to_string(), "failed to read config file: conf/viewer.yaml: permission denied");
        assert_eq!(err.kind(), ConfigErrorKind::Io);
    }
}
