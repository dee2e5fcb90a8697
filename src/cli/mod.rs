//! CLI argument parsing for enbak
//!
//! Supports global flags: --quiet, --verbose, --log-level, --log-json

pub mod args;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use args::ExportArgs;

/// Default location of the local note database
pub const DEFAULT_DATABASE: &str = "en_backup.db";

/// Enbak - export a locally synchronized note database to ENEX
#[derive(Parser, Debug)]
#[command(name = "enbak")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Log progress and timing for major phases
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log filter, e.g. `debug` or `enbak_core=trace`
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty local database
    InitDb {
        /// Database file to create
        #[arg(long, default_value = DEFAULT_DATABASE)]
        database: PathBuf,

        /// Replace an existing database file
        #[arg(long)]
        force: bool,
    },

    /// Export notes to ENEX files
    Export(ExportArgs),
}
