//! Command trait and context for dispatching commands

use std::time::Instant;

use tracing::debug;

use crate::cli::{Cli, Commands};
use crate::commands;
use enbak_core::error::Result;

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, start: Instant) -> Self {
        Self { cli, start }
    }
}

/// Trait for commands that can be executed
pub trait Command {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// No-op command (when no subcommand is provided)
pub struct NoCommand;

impl Command for NoCommand {
    fn execute(&self, _ctx: &CommandContext) -> Result<()> {
        println!("enbak {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Export a locally synchronized note database to ENEX.");
        println!();
        println!("Run `enbak --help` for usage information.");
        Ok(())
    }
}

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let result = match self {
            Commands::InitDb { database, force } => {
                commands::init_db::execute(ctx.cli, database, *force)
            }
            Commands::Export(args) => commands::export::execute(ctx.cli, args),
        };

        debug!(elapsed = ?ctx.start.elapsed(), "execute_command");
        result
    }
}
