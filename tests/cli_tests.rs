//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const REQUIRED_ONLY: &str =
    "imap:\n  host: imap.test.com\n  username: test@test.com\n  password: testpass\n";

/// Binary run in an empty directory with a clean environment.
fn viewer(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dmarc-viewer"));
    cmd.env_clear().current_dir(dir.path());
    cmd
}

fn write_config(dir: &TempDir, content: &str) -> String {
    let path = dir.path().join("config.yaml");
    fs::write(&path, content).expect("write config");
    path.to_str().expect("utf8 path").to_string()
}

#[test]
fn test_cli_version() {
    let dir = TempDir::new().expect("tmp");
    viewer(&dir).arg("--version").assert().success().stdout(predicate::str::contains("dmarc-viewer"));
}

#[test]
fn test_cli_help_lists_flags() {
    let dir = TempDir::new().expect("tmp");
    viewer(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--imap-use-tls"))
        .stdout(predicate::str::contains("--database"))
        .stdout(predicate::str::contains("--log-format"));
}

#[test]
fn test_file_config_prints_summary() {
    let dir = TempDir::new().expect("tmp");
    let path = write_config(&dir, REQUIRED_ONLY);
    viewer(&dir)
        .args(["--config", &path])
        .assert()
        .success()
        .stdout(predicate::str::contains("Host:     imap.test.com"))
        .stdout(predicate::str::contains("Password: t***s"))
        .stdout(predicate::str::contains("Path: ./dmarc-reports.db"))
        .stdout(predicate::str::contains("Interval:   15m"))
        .stdout(predicate::str::contains("testpass").not());
}

#[test]
fn test_default_config_file_in_working_directory_is_used() {
    let dir = TempDir::new().expect("tmp");
    write_config(&dir, REQUIRED_ONLY);
    viewer(&dir).assert().success().stdout(predicate::str::contains("imap.test.com"));
}

#[test]
fn test_env_only_config_without_file() {
    let dir = TempDir::new().expect("tmp");
    viewer(&dir)
        .env("DMARC_IMAP_HOST", "imap.env.com")
        .env("DMARC_IMAP_USERNAME", "u")
        .env("DMARC_IMAP_PASSWORD", "p")
        .env("DMARC_WEB_PORT", "9000")
        .assert()
        .success()
        .stdout(predicate::str::contains("Host:     imap.env.com"))
        .stdout(predicate::str::contains("Port: 9000"));
}

#[test]
fn test_precedence_cli_over_env_over_file() {
    let dir = TempDir::new().expect("tmp");
    let path = write_config(&dir, &format!("{REQUIRED_ONLY}  folder: FileBox\nweb:\n  port: 7000\n"));
    viewer(&dir)
        .args(["--config", &path, "--web-port", "9100"])
        .env("DMARC_WEB_PORT", "7500")
        .env("DMARC_IMAP_FOLDER", "EnvBox")
        .assert()
        .success()
        .stdout(predicate::str::contains("Folder:   EnvBox"))
        .stdout(predicate::str::contains("Port: 9100"));
}

#[test]
fn test_unsupplied_tls_flag_keeps_file_false() {
    let dir = TempDir::new().expect("tmp");
    let path = write_config(&dir, &format!("{REQUIRED_ONLY}  use_tls: false\n"));
    viewer(&dir)
        .args(["--config", &path])
        .assert()
        .success()
        .stdout(predicate::str::contains("Use TLS:  false"));
}

#[test]
fn test_missing_required_field_exits_nonzero() {
    let dir = TempDir::new().expect("tmp");
    let path = write_config(&dir, "imap:\n  username: u\n  password: p\n");
    viewer(&dir)
        .args(["--config", &path])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Error loading configuration: config validation failed: imap.host is required",
        ));
}

#[test]
fn test_invalid_log_level_exits_nonzero() {
    let dir = TempDir::new().expect("tmp");
    let path = write_config(&dir, REQUIRED_ONLY);
    viewer(&dir)
        .args(["--config", &path, "--log-level", "invalid_level"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "invalid log level: invalid_level (must be debug, info, warn, or error)",
        ));
}

#[test]
fn test_malformed_yaml_exits_nonzero() {
    let dir = TempDir::new().expect("tmp");
    let path = write_config(&dir, "imap:\n  host: [unclosed\n");
    viewer(&dir)
        .args(["--config", &path])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config file"));
}

#[test]
fn test_explicit_missing_config_file_exits_nonzero() {
    let dir = TempDir::new().expect("tmp");
    viewer(&dir)
        .args(["--config", "does-not-exist.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file: does-not-exist.yaml: "))
        .stderr(predicate::str::contains("os error"));
}

#[test]
fn test_bad_port_type_exits_nonzero() {
    let dir = TempDir::new().expect("tmp");
    let path = write_config(&dir, REQUIRED_ONLY);
    viewer(&dir)
        .args(["--config", &path])
        .env("DMARC_IMAP_PORT", "notanumber")
        .assert()
        .failure()
        .stderr(predicate::str::contains("imap.port"))
        .stderr(predicate::str::contains("notanumber"));
}

#[test]
fn test_unknown_flag_is_rejected() {
    let dir = TempDir::new().expect("tmp");
    viewer(&dir)
        .arg("--imap-hots")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--imap-hots"));
}

#[test]
fn test_json_log_format_emits_json_on_stderr() {
    let dir = TempDir::new().expect("tmp");
    let path = write_config(&dir, REQUIRED_ONLY);
    viewer(&dir)
        .args(["--config", &path, "--log-format", "json"])
        .assert()
        .success()
        .stderr(predicate::str::contains("\"message\":\"Configuration loaded\""));
}

#[test]
fn test_unknown_file_key_warning_reaches_stderr() {
    let dir = TempDir::new().expect("tmp");
    let path = write_config(&dir, &format!("{REQUIRED_ONLY}  hostnme: typo\n"));
    viewer(&dir)
        .args(["--config", &path])
        .assert()
        .success()
        .stderr(predicate::str::contains("Ignoring unknown config key 'imap.hostnme' from file layer"));
}

#[test]
fn test_empty_env_value_overrides_file_port() {
    let dir = TempDir::new().expect("tmp");
    let path = write_config(&dir, &format!("{REQUIRED_ONLY}  port: 143\n"));
    viewer(&dir)
        .args(["--config", &path])
        .env("DMARC_IMAP_PORT", "")
        .assert()
        .failure()
        .stderr(predicate::str::contains("imap.port: cannot parse '' as port number"));
}

#[test]
fn test_list_valued_port_in_file_exits_nonzero() {
    let dir = TempDir::new().expect("tmp");
    let path = write_config(&dir, &format!("{REQUIRED_ONLY}  port: [143]\n"));
    viewer(&dir)
        .args(["--config", &path])
        .assert()
        .failure()
        .stderr(predicate::str::contains("imap.port"));
}
