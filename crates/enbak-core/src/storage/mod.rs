//! Read access to the synchronized note database
//!
//! The exporter only talks to the [`Storage`] trait, so it does not care
//! which persistence engine sits behind it. [`SqliteStorage`] is the
//! implementation used by the CLI.

mod schema;
mod sqlite;

pub use schema::CURRENT_DB_VERSION;
pub use sqlite::SqliteStorage;

use crate::error::Result;
use crate::model::{Note, Notebook, Reminder, Task};

/// Lazily loaded sequence of records
pub type RecordIter<'a, T> = Box<dyn Iterator<Item = Result<T>> + 'a>;

/// Ordered, read-only view of a note database
///
/// Iteration order is defined by the implementation but must be stable for a
/// fixed database state.
pub trait Storage {
    /// All notebooks, in storage order
    fn notebooks(&self) -> Result<Vec<Notebook>>;

    /// Number of active notes in a notebook
    fn notebook_note_count(&self, notebook_guid: &str) -> Result<u64>;

    /// Number of active notes across all notebooks
    fn active_note_count(&self) -> Result<u64>;

    /// Number of trashed notes
    fn trash_note_count(&self) -> Result<u64>;

    /// Active notes of a notebook, loaded one at a time
    fn notes<'a>(&'a self, notebook_guid: &str) -> Result<RecordIter<'a, Note>>;

    /// Trashed notes from every notebook, loaded one at a time
    fn trash_notes(&self) -> Result<RecordIter<'_, Note>>;

    /// Tasks attached to a note, in storage order
    fn tasks(&self, note_guid: &str) -> Result<Vec<Task>>;

    /// Reminders attached to a task, in storage order
    fn reminders(&self, task_id: &str) -> Result<Vec<Reminder>>;
}
