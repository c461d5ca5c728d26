//! dmarc-viewer: resolve and print the application configuration
//!
//! Any configuration error is reported on stderr and exits non-zero before
//! anything else starts.

use std::process::ExitCode;

fn main() -> ExitCode {
    match dmarc_viewer::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error loading configuration: {err}");
            ExitCode::FAILURE
        }
    }
}
