//! `enbak init-db` command

use std::path::Path;

use enbak_core::error::Result;
use enbak_core::storage::SqliteStorage;

use crate::cli::Cli;

/// Create an empty database at `database`
pub fn execute(cli: &Cli, database: &Path, force: bool) -> Result<()> {
    SqliteStorage::init(database, force)?;

    if !cli.quiet {
        println!("Initialized database at {}", database.display());
    }

    Ok(())
}
