//! Human-readable configuration summary printed at startup.

use std::fmt::Write;

use crate::domain::ResolvedConfig;

/// Render the resolved configuration, with the password masked.
pub fn render_summary(cfg: &ResolvedConfig) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_summary(&mut out, cfg);
    out
}

fn write_summary(out: &mut String, cfg: &ResolvedConfig) -> std::fmt::Result {
    writeln!(out, "=== DMARC Report Viewer Configuration ===")?;
    writeln!(out)?;

    writeln!(out, "IMAP Configuration:")?;
    writeln!(out, "  Host:     {}", cfg.imap.host)?;
    writeln!(out, "  Port:     {}", cfg.imap.port)?;
    writeln!(out, "  Username: {}", cfg.imap.username)?;
    writeln!(out, "  Password: {}", mask_password(&cfg.imap.password))?;
    writeln!(out, "  Folder:   {}", cfg.imap.folder)?;
    writeln!(out, "  Use TLS:  {}", cfg.imap.use_tls)?;
    writeln!(out)?;

    writeln!(out, "Database Configuration:")?;
    writeln!(out, "  Path: {}", cfg.database.path)?;
    writeln!(out)?;

    writeln!(out, "Web Server Configuration:")?;
    writeln!(out, "  Host: {}", cfg.web.host)?;
    writeln!(out, "  Port: {}", cfg.web.port)?;
    writeln!(out)?;

    writeln!(out, "Sync Configuration:")?;
    writeln!(out, "  Interval:   {}", cfg.sync.interval)?;
    writeln!(out, "  On Startup: {}", cfg.sync.on_startup)?;
    writeln!(out)?;

    writeln!(out, "Logging Configuration:")?;
    writeln!(out, "  Level:  {}", cfg.logging.level)?;
    writeln!(out, "  Format: {}", cfg.logging.format)?;
    writeln!(out)?;

    writeln!(out, "Configuration loaded successfully!")
}

/// Show only the first and last characters of a secret.
pub fn mask_password(password: &str) -> String {
    let chars: Vec<char> = password.chars().collect();
    match chars.as_slice() {
        [] => String::new(),
        [_] | [_, _] => "***".to_string(),
        [first, .., last] => format!("{first}***{last}"),
    }
}
