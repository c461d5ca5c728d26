//! Validation of a materialized config. Checks run in a fixed order and the
//! first failure is returned.

use super::error::ValidationError;
use crate::domain::{LogFormat, LogLevel, ResolvedConfig};

pub fn validate(cfg: &ResolvedConfig) -> Result<(), ValidationError> {
    let required = [
        ("imap.host", &cfg.imap.host),
        ("imap.username", &cfg.imap.username),
        ("imap.password", &cfg.imap.password),
        ("database.path", &cfg.database.path),
    ];
    for (key, value) in required {
        if value.is_empty() {
            return Err(ValidationError::new(format!("{key} is required")));
        }
    }

    if cfg.logging.level.parse::<LogLevel>().is_err() {
        return Err(ValidationError::new(format!(
            "invalid log level: {} (must be debug, info, warn, or error)",
            cfg.logging.level
        )));
    }

    if cfg.logging.format.parse::<LogFormat>().is_err() {
        return Err(ValidationError::new(format!(
            "invalid log format: {} (must be json or text)",
            cfg.logging.format
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DatabaseConfig, ImapConfig, LoggingConfig, SyncConfig, WebConfig};

    fn valid() -> ResolvedConfig {
        ResolvedConfig {
            imap: ImapConfig {
                host: "imap.test.com".into(),
                port: 993,
                username: "test@test.com".into(),
                password: "testpass".into(),
                folder: "INBOX".into(),
                use_tls: true,
            },
            database: DatabaseConfig { path: "./test.db".into() },
            web: WebConfig { host: "localhost".into(), port: 8080 },
            sync: SyncConfig { interval: "15m".into(), on_startup: true },
            logging: LoggingConfig { level: "info".into(), format: "text".into() },
        }
    }

    fn message(cfg: &ResolvedConfig) -> String {
        validate(cfg).expect_err("should fail").message
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid()).is_ok());
    }

    #[test]
    fn test_required_field_messages() {
        let mut cfg = valid();
        cfg.imap.host.clear();
        assert_eq!(message(&cfg), "imap.host is required");

        let mut cfg = valid();
        cfg.imap.username.clear();
        assert_eq!(message(&cfg), "imap.username is required");

        let mut cfg = valid();
        cfg.imap.password.clear();
        assert_eq!(message(&cfg), "imap.password is required");

        let mut cfg = valid();
        cfg.database.path.clear();
        assert_eq!(message(&cfg), "database.path is required");
    }

    #[test]
    fn test_invalid_log_level_message() {
        let mut cfg = valid();
        cfg.logging.level = "invalid_level".into();
        assert_eq!(
            message(&cfg),
            "invalid log level: invalid_level (must be debug, info, warn, or error)"
        );
    }

    #[test]
    fn test_invalid_log_format_message() {
        let mut cfg = valid();
        cfg.logging.format = "xml".into();
        assert_eq!(message(&cfg), "invalid log format: xml (must be json or text)");
    }

    #[test]
    fn test_first_failure_wins() {
        let mut cfg = valid();
        cfg.imap.username.clear();
        cfg.imap.password.clear();
        cfg.logging.level = "loud".into();
        assert_eq!(message(&cfg), "imap.username is required");
    }

    #[test]
    fn test_all_levels_and_formats_accepted() {
        for level in ["debug", "info", "warn", "error"] {
            for format in ["json", "text"] {
                let mut cfg = valid();
                cfg.logging.level = level.into();
                cfg.logging.format = format.into();
                assert!(validate(&cfg).is_ok(), "{level}/{format}");
            }
        }
    }
}
