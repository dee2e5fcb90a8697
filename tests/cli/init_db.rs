use crate::cli::support::enbak;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_init_db_creates_file() {
    let dir = tempdir().unwrap();

    enbak()
        .current_dir(dir.path())
        .arg("init-db")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized database"));

    assert!(dir.path().join("en_backup.db").is_file());
}

#[test]
fn test_init_db_refuses_existing_file() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("notes.db");

    enbak()
        .arg("init-db")
        .arg("--database")
        .arg(&db)
        .assert()
        .success();

    enbak()
        .arg("init-db")
        .arg("--database")
        .arg(&db)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("--force"));

    enbak()
        .arg("init-db")
        .arg("--database")
        .arg(&db)
        .arg("--force")
        .assert()
        .success();
}

#[test]
fn test_init_db_then_export_reports_empty() {
    let dir = tempdir().unwrap();

    enbak()
        .current_dir(dir.path())
        .arg("init-db")
        .assert()
        .success();

    enbak()
        .current_dir(dir.path())
        .args(["export", "out"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Database is empty"));
}
