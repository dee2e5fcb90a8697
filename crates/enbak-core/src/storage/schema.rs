//! SQLite schema for the local note database

use rusqlite::{params, Connection, OptionalExtension, Result};

/// Databases recorded with any other version must be resynchronized
pub const CURRENT_DB_VERSION: i32 = 5;

const DB_VERSION_KEY: &str = "DB_VERSION";

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS config (
    name TEXT PRIMARY KEY,
    value TEXT
);

CREATE TABLE IF NOT EXISTS notebooks (
    guid TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    stack TEXT
);

-- raw_note holds the JSON payload; title and flags are duplicated for ordering
CREATE TABLE IF NOT EXISTS notes (
    guid TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    notebook_guid TEXT NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 1,
    raw_note TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_notes_notebook ON notes(notebook_guid, is_active);

CREATE TABLE IF NOT EXISTS tasks (
    task_id TEXT PRIMARY KEY,
    note_guid TEXT NOT NULL,
    raw_task TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_tasks_note ON tasks(note_guid);

CREATE TABLE IF NOT EXISTS reminders (
    reminder_id TEXT PRIMARY KEY,
    task_id TEXT NOT NULL,
    raw_reminder TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_reminders_task ON reminders(task_id);
"#;

/// Create all tables and stamp the current version
pub fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR REPLACE INTO config (name, value) VALUES (?1, ?2)",
        params![DB_VERSION_KEY, CURRENT_DB_VERSION.to_string()],
    )?;
    Ok(())
}

/// Read the recorded version, `None` when missing
pub fn read_db_version(conn: &Connection) -> Result<Option<String>> {
    let has_config: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = 'config'",
        [],
        |row| row.get(0),
    )?;
    if !has_config {
        return Ok(None);
    }

    conn.query_row(
        "SELECT value FROM config WHERE name = ?1",
        params![DB_VERSION_KEY],
        |row| row.get(0),
    )
    .optional()
}

#[cfg(test)]
pub fn force_set_db_version(conn: &Connection, version: &str) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO config (name, value) VALUES (?1, ?2)",
        params![DB_VERSION_KEY, version],
    )?;
    Ok(())
}

#[cfg(test)]
pub fn delete_db_version(conn: &Connection) -> Result<()> {
    conn.execute(
        "DELETE FROM config WHERE name = ?1",
        params![DB_VERSION_KEY],
    )?;
    Ok(())
}
