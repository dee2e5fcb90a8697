//! `enbak export` command

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use enbak_core::config::ExportConfig;
use enbak_core::error::{EnbakError, Result};
use enbak_core::export::{ExportEvent, NoteExporter};
use enbak_core::storage::SqliteStorage;

use crate::cli::{Cli, ExportArgs};

/// Export the database named in `args` into its output directory
pub fn execute(cli: &Cli, args: &ExportArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) if !path.is_file() => {
            return Err(EnbakError::UsageError(format!(
                "config file not found: {}",
                path.display()
            )))
        }
        Some(path) => ExportConfig::load(path)?.merge(args.flags()),
        None => args.flags(),
    };
    debug!(?config, database = %args.database.display(), "export options");

    let storage = SqliteStorage::open(&args.database)?;

    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = Arc::clone(&interrupted);

    let _ = ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::SeqCst);
    });

    let quiet = cli.quiet;
    let summary = NoteExporter::new(&storage, &args.output_dir, config)
        .with_interrupt_flag(interrupted)
        .with_progress(move |event| report_progress(quiet, &event))
        .export()?;

    if !cli.quiet {
        println!(
            "Exported {} notes to {} files in {}",
            summary.notes,
            summary.files.len(),
            args.output_dir.display()
        );
    }

    Ok(())
}

fn report_progress(quiet: bool, event: &ExportEvent<'_>) {
    if quiet {
        return;
    }

    match event {
        ExportEvent::NotebookStarted { name, notes } => {
            eprintln!("Exporting notebook {} ({} notes)", name, notes);
        }
        ExportEvent::FileFinished { path, .. } => {
            debug!(path = %path.display(), "file finished");
        }
        ExportEvent::NoteWritten { .. } => {}
    }
}
