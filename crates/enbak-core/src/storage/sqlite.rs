use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;

use super::schema::{create_schema, read_db_version, CURRENT_DB_VERSION};
use super::{RecordIter, Storage};
use crate::error::{EnbakError, Result};
use crate::model::{Note, Notebook, Reminder, Task};
use crate::{bail_invalid, map_db_err};

/// Note database stored in a single SQLite file
#[derive(Debug)]
pub struct SqliteStorage {
    pub(super) conn: Connection,
}

impl SqliteStorage {
    /// Create a new, empty database at `path`
    ///
    /// An existing file is only replaced when `force` is set.
    pub fn init(path: &Path, force: bool) -> Result<Self> {
        if path.is_dir() {
            bail_invalid!("database path", path.display());
        }

        if path.exists() {
            if !force {
                return Err(EnbakError::DatabaseExists {
                    path: path.to_path_buf(),
                });
            }
            std::fs::remove_file(path)
                .map_err(|e| EnbakError::filesystem("remove database", path, e))?;
        }

        let conn = Connection::open(path).map_err(|e| map_db_err!("create database", e))?;
        create_schema(&conn).map_err(|e| map_db_err!("create database schema", e))?;
        tracing::info!(path = %path.display(), version = CURRENT_DB_VERSION, "initialized database");

        Ok(Self { conn })
    }

    /// Open an existing database, rejecting missing or outdated ones
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(EnbakError::DatabaseNotFound {
                path: path.to_path_buf(),
            });
        }

        let conn = Connection::open(path).map_err(|e| {
            EnbakError::Other(format!(
                "failed to open database at {}: {}",
                path.display(),
                e
            ))
        })?;

        let found = read_db_version(&conn).map_err(|e| map_db_err!("read database version", e))?;
        let expected = CURRENT_DB_VERSION.to_string();
        match found {
            Some(version) if version == expected => {}
            other => {
                return Err(EnbakError::ResyncRequired {
                    found: other.unwrap_or_else(|| "none".to_string()),
                    expected,
                })
            }
        }

        tracing::debug!(path = %path.display(), "opened database");
        Ok(Self { conn })
    }

    /// In-memory database with a fresh schema
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| map_db_err!("open database", e))?;
        create_schema(&conn).map_err(|e| map_db_err!("create database schema", e))?;
        Ok(Self { conn })
    }

    pub fn add_notebooks(&self, notebooks: &[Notebook]) -> Result<()> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| map_db_err!("start transaction", e))?;

        for notebook in notebooks {
            tx.execute(
                "INSERT OR REPLACE INTO notebooks (guid, name, stack) VALUES (?1, ?2, ?3)",
                params![notebook.guid, notebook.name, notebook.stack],
            )
            .map_err(|e| map_db_err!("insert notebook", e))?;
        }

        tx.commit().map_err(|e| map_db_err!("commit notebooks", e))
    }

    pub fn add_note(&self, note: &Note) -> Result<()> {
        let raw_note = serde_json::to_string(note)?;
        self.conn
            .execute(
                "INSERT OR REPLACE INTO notes (guid, title, notebook_guid, is_active, raw_note)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    note.guid,
                    note.title,
                    note.notebook_guid,
                    note.active,
                    raw_note
                ],
            )
            .map_err(|e| map_db_err!("insert note", e))?;
        Ok(())
    }

    pub fn add_tasks(&self, tasks: &[Task]) -> Result<()> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| map_db_err!("start transaction", e))?;

        for task in tasks {
            tx.execute(
                "INSERT OR REPLACE INTO tasks (task_id, note_guid, raw_task) VALUES (?1, ?2, ?3)",
                params![task.id, task.note_guid, serde_json::to_string(task)?],
            )
            .map_err(|e| map_db_err!("insert task", e))?;
        }

        tx.commit().map_err(|e| map_db_err!("commit tasks", e))
    }

    pub fn add_reminder(&self, reminder: &Reminder) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO reminders (reminder_id, task_id, raw_reminder)
                 VALUES (?1, ?2, ?3)",
                params![
                    reminder.id,
                    reminder.task_id,
                    serde_json::to_string(reminder)?
                ],
            )
            .map_err(|e| map_db_err!("insert reminder", e))?;
        Ok(())
    }

    fn count(&self, sql: &str, params: impl rusqlite::Params) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row(sql, params, |row| row.get(0))
            .map_err(|e| map_db_err!("count notes", e))?;
        Ok(count.max(0) as u64)
    }

    fn query_strings(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| map_db_err!("prepare query", e))?;
        let rows = stmt
            .query_map(params, |row| row.get::<_, String>(0))
            .map_err(|e| map_db_err!("run query", e))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| map_db_err!("read row", e))
    }

    fn query_payloads<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<T>> {
        self.query_strings(sql, params)?
            .iter()
            .map(|raw| serde_json::from_str(raw).map_err(EnbakError::from))
            .collect()
    }

    fn load_note(&self, guid: &str) -> Result<Note> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT raw_note FROM notes WHERE guid = ?1",
                params![guid],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| map_db_err!("load note", e))?;

        let raw = raw.ok_or_else(|| EnbakError::Other(format!("note {} disappeared", guid)))?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn lazy_notes(&self, guids: Vec<String>) -> RecordIter<'_, Note> {
        Box::new(guids.into_iter().map(move |guid| self.load_note(&guid)))
    }
}

impl Storage for SqliteStorage {
    fn notebooks(&self) -> Result<Vec<Notebook>> {
        let mut stmt = self
            .conn
            .prepare("SELECT guid, name, stack FROM notebooks ORDER BY name, guid")
            .map_err(|e| map_db_err!("prepare query", e))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Notebook {
                    guid: row.get(0)?,
                    name: row.get(1)?,
                    stack: row.get(2)?,
                })
            })
            .map_err(|e| map_db_err!("list notebooks", e))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| map_db_err!("read notebook", e))
    }

    fn notebook_note_count(&self, notebook_guid: &str) -> Result<u64> {
        self.count(
            "SELECT COUNT(*) FROM notes WHERE notebook_guid = ?1 AND is_active = 1",
            params![notebook_guid],
        )
    }

    fn active_note_count(&self) -> Result<u64> {
        self.count("SELECT COUNT(*) FROM notes WHERE is_active = 1", [])
    }

    fn trash_note_count(&self) -> Result<u64> {
        self.count("SELECT COUNT(*) FROM notes WHERE is_active = 0", [])
    }

    fn notes<'a>(&'a self, notebook_guid: &str) -> Result<RecordIter<'a, Note>> {
        let guids = self.query_strings(
            "SELECT guid FROM notes WHERE notebook_guid = ?1 AND is_active = 1
             ORDER BY title, guid",
            params![notebook_guid],
        )?;
        Ok(self.lazy_notes(guids))
    }

    fn trash_notes(&self) -> Result<RecordIter<'_, Note>> {
        let guids = self.query_strings(
            "SELECT guid FROM notes WHERE is_active = 0 ORDER BY title, guid",
            [],
        )?;
        Ok(self.lazy_notes(guids))
    }

    fn tasks(&self, note_guid: &str) -> Result<Vec<Task>> {
        self.query_payloads(
            "SELECT raw_task FROM tasks WHERE note_guid = ?1 ORDER BY rowid",
            params![note_guid],
        )
    }

    fn reminders(&self, task_id: &str) -> Result<Vec<Reminder>> {
        self.query_payloads(
            "SELECT raw_reminder FROM reminders WHERE task_id = ?1 ORDER BY rowid",
            params![task_id],
        )
    }
}
