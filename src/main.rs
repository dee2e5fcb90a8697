//! Enbak - export a locally synchronized note database to ENEX
//!
//! Writes one ENEX archive per notebook, or one per note, into a target
//! directory.

mod cli;
mod commands;

use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use cli::Cli;
use enbak_core::error::ExitCode as EnbakExitCode;
use enbak_core::logging;

fn main() -> ExitCode {
    let start = Instant::now();
    let cli = Cli::parse();

    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::debug!(elapsed = ?start.elapsed(), "parse_args");

    match commands::dispatch::run(&cli, start) {
        Ok(()) => ExitCode::from(EnbakExitCode::Success as u8),
        Err(e) => {
            let exit_code = e.exit_code();
            tracing::debug!(error_type = e.error_type(), "command failed");

            if !cli.quiet {
                eprintln!("error: {}", e);
            }

            ExitCode::from(exit_code as u8)
        }
    }
}
