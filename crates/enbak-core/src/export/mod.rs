//! Export of a note database into ENEX files
//!
//! Layout of the target directory:
//! - notebook mode: `[<stack>/]<notebook>.enex`, all notes of a notebook in
//!   one file
//! - single-note mode: `[<stack>/]<notebook>/<title>.enex`, one file per note
//! - trash (opt-in): `Trash.enex` or `Trash/<title>.enex`
//!
//! Notebooks without active notes produce nothing. Files are written in place;
//! an interrupted run leaves the file being written incomplete.

pub mod enex;
pub mod paths;

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::config::ExportConfig;
use crate::error::{EnbakError, Result};
use crate::model::{Note, Notebook, Task};
use crate::storage::Storage;
use crate::trace_time;

use enex::{EnexOptions, EnexWriter};
use paths::PathAllocator;

/// Name of the pseudo-notebook holding trashed notes
pub const TRASH_NOTEBOOK: &str = "Trash";

pub const ENEX_EXTENSION: &str = "enex";

/// What a finished run produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Files in the order they were written
    pub files: Vec<PathBuf>,
    /// Notes written across all files
    pub notes: usize,
}

/// Progress notifications; observers cannot change what gets written
#[derive(Debug)]
pub enum ExportEvent<'e> {
    NotebookStarted { name: &'e str, notes: u64 },
    NoteWritten { note: &'e Note },
    FileFinished { path: &'e Path, notes: usize },
}

type ProgressFn<'a> = Box<dyn FnMut(ExportEvent<'_>) + 'a>;

/// Drives one export run over a [`Storage`]
pub struct NoteExporter<'a, S: Storage + ?Sized> {
    storage: &'a S,
    config: ExportConfig,
    paths: PathAllocator,
    interrupted: Option<Arc<AtomicBool>>,
    progress: Option<ProgressFn<'a>>,
}

impl<'a, S: Storage + ?Sized> NoteExporter<'a, S> {
    pub fn new(storage: &'a S, target_dir: impl Into<PathBuf>, config: ExportConfig) -> Self {
        Self {
            storage,
            config,
            paths: PathAllocator::new(target_dir, config.overwrite),
            interrupted: None,
            progress: None,
        }
    }

    /// Stop between notes once `flag` is set
    pub fn with_interrupt_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupted = Some(flag);
        self
    }

    pub fn with_progress(mut self, progress: impl FnMut(ExportEvent<'_>) + 'a) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    /// Run the export
    ///
    /// Fails with [`EnbakError::EmptyDatabase`] before touching the target
    /// directory when there are neither active nor trashed notes.
    pub fn export(mut self) -> Result<ExportSummary> {
        let start = Instant::now();
        let active = self.storage.active_note_count()?;
        let trash = self.storage.trash_note_count()?;

        debug!(
            target = %self.paths.root().display(),
            active,
            trash,
            single_notes = self.config.single_notes,
            include_trash = self.config.include_trash,
            "export plan"
        );

        if active == 0 && trash == 0 {
            return Err(EnbakError::EmptyDatabase);
        }

        let mut summary = ExportSummary::default();

        if active > 0 {
            info!("Exporting notebooks...");
            self.export_active(&mut summary)?;
        }

        if trash > 0 && self.config.include_trash {
            info!("Exporting trash...");
            self.export_trash(trash, &mut summary)?;
        }

        trace_time!(
            start,
            "export",
            files = summary.files.len(),
            notes = summary.notes
        );
        Ok(summary)
    }

    fn export_active(&mut self, summary: &mut ExportSummary) -> Result<()> {
        let storage = self.storage;

        for notebook in storage.notebooks()? {
            debug!(guid = %notebook.guid, name = %notebook.name, stack = ?notebook.stack, "exporting notebook");

            let count = storage.notebook_note_count(&notebook.guid)?;
            if count == 0 {
                debug!(guid = %notebook.guid, "notebook is empty, skip");
                continue;
            }

            self.emit(ExportEvent::NotebookStarted {
                name: &notebook.name,
                notes: count,
            });
            self.export_notebook(&notebook, summary)?;
        }

        Ok(())
    }

    fn export_notebook(&mut self, notebook: &Notebook, summary: &mut ExportSummary) -> Result<()> {
        let storage = self.storage;
        let mut dirs: Vec<String> = notebook.stack.iter().cloned().collect();
        let notes = storage.notes(&notebook.guid)?;

        if self.config.single_notes {
            dirs.push(notebook.name.clone());
            self.output_single_notes(&dirs, notes, summary)
        } else {
            self.output_notebook(&dirs, &notebook.name, notes, summary)
        }
    }

    fn export_trash(&mut self, count: u64, summary: &mut ExportSummary) -> Result<()> {
        let storage = self.storage;
        let notes = storage.trash_notes()?;

        self.emit(ExportEvent::NotebookStarted {
            name: TRASH_NOTEBOOK,
            notes: count,
        });

        if self.config.single_notes {
            self.output_single_notes(&[TRASH_NOTEBOOK], notes, summary)
        } else {
            self.output_notebook(&[] as &[&str], TRASH_NOTEBOOK, notes, summary)
        }
    }

    fn output_single_notes<D: AsRef<str>>(
        &mut self,
        dirs: &[D],
        notes: impl Iterator<Item = Result<Note>>,
        summary: &mut ExportSummary,
    ) -> Result<()> {
        for note in notes {
            let note = note?;
            let path = self
                .paths
                .allocate(dirs, &format!("{}.{}", note.title, ENEX_EXTENSION))?;
            self.write_export_file(&path, std::iter::once(Ok(note)), summary)?;
        }
        Ok(())
    }

    fn output_notebook<D: AsRef<str>>(
        &mut self,
        dirs: &[D],
        notebook_name: &str,
        notes: impl Iterator<Item = Result<Note>>,
        summary: &mut ExportSummary,
    ) -> Result<()> {
        let path = self
            .paths
            .allocate(dirs, &format!("{}.{}", notebook_name, ENEX_EXTENSION))?;
        self.write_export_file(&path, notes, summary)
    }

    fn write_export_file(
        &mut self,
        path: &Path,
        notes: impl Iterator<Item = Result<Note>>,
        summary: &mut ExportSummary,
    ) -> Result<()> {
        debug!(path = %path.display(), "writing file");

        let file = File::create(path).map_err(|e| EnbakError::filesystem("create file", path, e))?;
        let mut writer = EnexWriter::new(BufWriter::new(file), self.enex_options());
        let write_failed = |e| EnbakError::filesystem("write file", path, e);

        writer.write_header().map_err(write_failed)?;

        let mut written = 0;
        for note in notes {
            self.check_interrupted()?;
            let note = note?;
            debug!(guid = %note.guid, title = %note.title, "exporting note");

            let tasks = load_sorted_tasks(self.storage, &note.guid)?;
            writer.write_note(&note, &tasks).map_err(write_failed)?;
            written += 1;

            self.emit(ExportEvent::NoteWritten { note: &note });
        }

        writer.write_footer().map_err(write_failed)?;

        summary.files.push(path.to_path_buf());
        summary.notes += written;
        self.emit(ExportEvent::FileFinished {
            path,
            notes: written,
        });
        Ok(())
    }

    fn enex_options(&self) -> EnexOptions {
        EnexOptions {
            no_export_date: self.config.no_export_date,
            add_guid: self.config.add_guid,
        }
    }

    fn check_interrupted(&self) -> Result<()> {
        match &self.interrupted {
            Some(flag) if flag.load(Ordering::SeqCst) => Err(EnbakError::Interrupted),
            _ => Ok(()),
        }
    }

    fn emit(&mut self, event: ExportEvent<'_>) {
        if let Some(progress) = self.progress.as_mut() {
            progress(event);
        }
    }
}

/// Tasks of a note ordered by sort weight, each with its reminders attached
///
/// The sort is stable, so tasks with equal weights keep storage order.
pub fn load_sorted_tasks<S: Storage + ?Sized>(storage: &S, note_guid: &str) -> Result<Vec<Task>> {
    let mut tasks = storage.tasks(note_guid)?;
    tasks.sort_by(|a, b| a.sort_weight.cmp(&b.sort_weight));

    for task in &mut tasks {
        task.reminders = storage.reminders(&task.id)?;
    }

    Ok(tasks)
}
