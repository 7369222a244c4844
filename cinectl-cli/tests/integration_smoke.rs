//! Smoke tests to verify command module wiring

use assert_cmd::Command;
use predicates::prelude::*;

// === Top level ===

#[test]
fn test_help_lists_subcommands() {
    let mut cmd = Command::cargo_bin("cinectl").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("rehash-passwords"));
}

#[test]
fn test_unknown_subcommand_fails() {
    let mut cmd = Command::cargo_bin("cinectl").unwrap();
    cmd.arg("projector");

    cmd.assert().failure();
}

// === Serve Command Tests ===

#[test]
fn test_serve_help() {
    let mut cmd = Command::cargo_bin("cinectl").unwrap();
    cmd.arg("serve").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--bind"))
        .stdout(predicate::str::contains("--database-url"))
        .stdout(predicate::str::contains("--cors-permissive"));
}

#[test]
fn test_serve_without_database_url_fails() {
    let home = tempfile::tempdir().unwrap();
    let workdir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("cinectl").unwrap();
    cmd.arg("serve")
        .current_dir(workdir.path())
        .env("HOME", home.path())
        .env_remove("DATABASE_URL");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL not set"));
}

#[test]
fn test_missing_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("cinectl").unwrap();
    cmd.arg("--config")
        .arg(dir.path().join("absent.toml"))
        .arg("serve");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

// === Rehash Command Tests ===

#[test]
fn test_rehash_help() {
    let mut cmd = Command::cargo_bin("cinectl").unwrap();
    cmd.arg("rehash-passwords").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"));
}
