use crate::cli::support::enbak;
use predicates::prelude::*;

#[test]
fn test_help_flag() {
    enbak()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: enbak"))
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("init-db"));
}

#[test]
fn test_no_command_prints_version() {
    enbak()
        .assert()
        .success()
        .stdout(predicate::str::contains("enbak"))
        .stdout(predicate::str::contains("--help"));
}

#[test]
fn test_export_requires_output_dir() {
    enbak().arg("export").assert().code(2);
}
