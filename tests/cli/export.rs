use crate::cli::support::{enbak, init_db, populated_db, trash_only_db};
use enbak_core::model::Notebook;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_export_notebooks() {
    let dir = tempdir().unwrap();
    let db = populated_db(dir.path());
    let out = dir.path().join("out");

    enbak()
        .arg("export")
        .arg("--database")
        .arg(&db)
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 notes to 2 files"));

    assert!(out.join("stack1/name1.enex").is_file());
    assert!(out.join("name2.enex").is_file());
    assert!(!out.join("name3.enex").exists());
}

#[test]
fn test_export_single_notes() {
    let dir = tempdir().unwrap();
    let db = populated_db(dir.path());
    let out = dir.path().join("out");

    enbak()
        .arg("export")
        .arg("--database")
        .arg(&db)
        .arg("--single-notes")
        .arg(&out)
        .assert()
        .success();

    assert!(out.join("stack1/name1/title1.enex").is_file());
    assert!(out.join("name2/title2.enex").is_file());
}

#[test]
fn test_export_default_database_in_working_directory() {
    let dir = tempdir().unwrap();
    populated_db(dir.path());

    enbak()
        .current_dir(dir.path())
        .args(["export", "out"])
        .assert()
        .success();

    assert!(dir.path().join("out/name2.enex").is_file());
}

#[test]
fn test_export_empty_database() {
    let dir = tempdir().unwrap();
    let (db, storage) = init_db(dir.path());
    storage
        .add_notebooks(&[Notebook::new("nbid1", "name1")])
        .unwrap();
    let out = dir.path().join("out");

    enbak()
        .arg("export")
        .arg("--database")
        .arg(&db)
        .arg(&out)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Database is empty"));

    assert!(!out.exists());
}

#[test]
fn test_export_missing_database() {
    let dir = tempdir().unwrap();

    enbak()
        .arg("export")
        .arg("--database")
        .arg(dir.path().join("missing.db"))
        .arg(dir.path().join("out"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("database not found"));
}

#[test]
fn test_export_old_db() {
    let dir = tempdir().unwrap();
    let db = populated_db(dir.path());

    let conn = rusqlite::Connection::open(&db).unwrap();
    conn.execute(
        "UPDATE config SET value = '0' WHERE name = 'DB_VERSION'",
        [],
    )
    .unwrap();
    drop(conn);

    enbak()
        .arg("export")
        .arg("--database")
        .arg(&db)
        .arg(dir.path().join("out"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Full resync is required"));
}

#[test]
fn test_export_existing_file_gets_suffix() {
    let dir = tempdir().unwrap();
    let db = populated_db(dir.path());
    let out = dir.path().join("out");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("name2.enex"), "").unwrap();

    enbak()
        .arg("export")
        .arg("--database")
        .arg(&db)
        .arg(&out)
        .assert()
        .success();

    assert!(out.join("name2 (1).enex").is_file());
    assert_eq!(fs::metadata(out.join("name2.enex")).unwrap().len(), 0);
}

#[test]
fn test_export_overwrite() {
    let dir = tempdir().unwrap();
    let db = populated_db(dir.path());
    let out = dir.path().join("out");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("name2.enex"), "").unwrap();

    enbak()
        .arg("export")
        .arg("--database")
        .arg(&db)
        .arg("--overwrite")
        .arg(&out)
        .assert()
        .success();

    assert!(fs::metadata(out.join("name2.enex")).unwrap().len() > 0);
    assert!(!out.join("name2 (1).enex").exists());
}

#[test]
fn test_export_trash_excluded_by_default() {
    let dir = tempdir().unwrap();
    let db = trash_only_db(dir.path());
    let out = dir.path().join("out");

    enbak()
        .arg("export")
        .arg("--database")
        .arg(&db)
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 0 notes to 0 files"));

    assert!(!out.exists());
}

#[test]
fn test_export_include_trash() {
    let dir = tempdir().unwrap();
    let db = trash_only_db(dir.path());
    let out = dir.path().join("out");

    enbak()
        .arg("export")
        .arg("--database")
        .arg(&db)
        .arg("--include-trash")
        .arg(&out)
        .assert()
        .success();

    assert!(out.join("Trash.enex").is_file());
}

#[test]
fn test_export_include_trash_single_notes() {
    let dir = tempdir().unwrap();
    let db = trash_only_db(dir.path());
    let out = dir.path().join("out");

    enbak()
        .arg("export")
        .arg("--database")
        .arg(&db)
        .args(["--include-trash", "--single-notes"])
        .arg(&out)
        .assert()
        .success();

    assert!(out.join("Trash/title1.enex").is_file());
}

#[test]
fn test_export_no_export_date_and_guid() {
    let dir = tempdir().unwrap();
    let db = populated_db(dir.path());
    let out = dir.path().join("out");

    enbak()
        .arg("export")
        .arg("--database")
        .arg(&db)
        .args(["--no-export-date", "--add-guid"])
        .arg(&out)
        .assert()
        .success();

    let xml = fs::read_to_string(out.join("name2.enex")).unwrap();
    assert!(!xml.contains("export-date"));
    assert!(xml.contains("<guid>id2</guid>"));
}

#[test]
fn test_export_config_file() {
    let dir = tempdir().unwrap();
    let db = populated_db(dir.path());
    let out = dir.path().join("out");
    let config = dir.path().join("export.toml");
    fs::write(&config, "single_notes = true\n").unwrap();

    enbak()
        .arg("export")
        .arg("--database")
        .arg(&db)
        .arg("--config")
        .arg(&config)
        .arg(&out)
        .assert()
        .success();

    assert!(out.join("name2/title2.enex").is_file());
}

#[test]
fn test_export_config_file_unknown_key() {
    let dir = tempdir().unwrap();
    let db = populated_db(dir.path());
    let config = dir.path().join("export.toml");
    fs::write(&config, "bogus = true\n").unwrap();

    enbak()
        .arg("export")
        .arg("--database")
        .arg(&db)
        .arg("--config")
        .arg(&config)
        .arg(dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_export_missing_config_file() {
    let dir = tempdir().unwrap();
    let db = populated_db(dir.path());

    enbak()
        .arg("export")
        .arg("--database")
        .arg(&db)
        .arg("--config")
        .arg(dir.path().join("missing.toml"))
        .arg(dir.path().join("out"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn test_export_quiet() {
    let dir = tempdir().unwrap();
    let db = populated_db(dir.path());

    enbak()
        .arg("--quiet")
        .arg("export")
        .arg("--database")
        .arg(&db)
        .arg(dir.path().join("out"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());
}
