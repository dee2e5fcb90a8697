use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::path::{Path, PathBuf};

use enbak_core::model::{Note, Notebook};
use enbak_core::storage::SqliteStorage;

/// Get a Command for enbak
pub fn enbak() -> Command {
    cargo_bin_cmd!("enbak")
}

/// Create `en_backup.db` in `dir` and return its path
pub fn init_db(dir: &Path) -> (PathBuf, SqliteStorage) {
    let path = dir.join("en_backup.db");
    let storage = SqliteStorage::init(&path, false).unwrap();
    (path, storage)
}

/// Database with a stacked notebook, a plain notebook and an empty one
pub fn populated_db(dir: &Path) -> PathBuf {
    let (path, storage) = init_db(dir);
    storage
        .add_notebooks(&[
            Notebook::new("nbid1", "name1").with_stack("stack1"),
            Notebook::new("nbid2", "name2"),
            Notebook::new("nbid3", "name3"),
        ])
        .unwrap();
    storage
        .add_note(&Note::new("id1", "title1", "test", "nbid1"))
        .unwrap();
    storage
        .add_note(&Note::new("id2", "title2", "test", "nbid2"))
        .unwrap();
    path
}

/// Database whose only note sits in the trash
pub fn trash_only_db(dir: &Path) -> PathBuf {
    let (path, storage) = init_db(dir);
    storage
        .add_note(&Note::new("id1", "title1", "test", "nbid1").trashed())
        .unwrap();
    path
}
