use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

fn create_files(dir: &Path) {
    std::fs::write(dir.join("photo.png"), "png").unwrap();
    std::fs::write(dir.join("notes.txt"), "notes").unwrap();
}

/// An empty config file kept apart from the organized directory, so runs do
/// not pick up the user's own configuration.
fn empty_config() -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "").unwrap();
    (dir, path)
}

fn sweep() -> Command {
    Command::cargo_bin("sweep").unwrap()
}

#[test]
fn test_help_flag() {
    sweep()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sort the files"))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--undo"));
}

#[test]
fn test_version_flag() {
    sweep()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_target_dir() {
    sweep()
        .arg("/non/existent/sweep/target")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_undo_conflicts_with_dry_run() {
    let dir = tempdir().unwrap();

    sweep()
        .args(["--undo", "--dry-run"])
        .arg(dir.path())
        .assert()
        .failure();
}

#[test]
fn test_dry_run_flag() {
    let dir = tempdir().unwrap();
    create_files(dir.path());
    let (_config_dir, config) = empty_config();

    sweep()
        .arg("--dry-run")
        .arg("--config")
        .arg(&config)
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("DRY RUN"))
        .stdout(predicate::str::contains("would move to Images/"))
        .stdout(predicate::str::contains("No files were modified"));

    assert!(dir.path().join("photo.png").exists());
    assert!(dir.path().join("notes.txt").exists());
    assert!(!dir.path().join("Images").exists());
    assert!(!dir.path().join(".sweep_undo.json").exists());
}

#[test]
fn test_organize_then_undo() {
    let dir = tempdir().unwrap();
    create_files(dir.path());
    let (_config_dir, config) = empty_config();

    sweep()
        .arg("--config")
        .arg(&config)
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("SUMMARY"))
        .stdout(predicate::str::contains("Organization complete!"));

    assert!(dir.path().join("Images/photo.png").exists());
    assert!(dir.path().join("Documents/notes.txt").exists());
    assert!(dir.path().join(".sweep_undo.json").exists());

    sweep()
        .arg("--undo")
        .arg("--config")
        .arg(&config)
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("UNDO COMPLETE"));

    assert!(dir.path().join("photo.png").exists());
    assert!(dir.path().join("notes.txt").exists());
    assert!(!dir.path().join(".sweep_undo.json").exists());
}

#[test]
fn test_undo_without_log() {
    let dir = tempdir().unwrap();
    let (_config_dir, config) = empty_config();

    sweep()
        .arg("--undo")
        .arg("--config")
        .arg(&config)
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to revert"));
}

#[test]
fn test_empty_directory() {
    let dir = tempdir().unwrap();
    let (_config_dir, config) = empty_config();

    sweep()
        .arg("--config")
        .arg(&config)
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No files found to organize."));
}

#[test]
fn test_corrupt_undo_log_fails() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join(".sweep_undo.json"), "not json").unwrap();
    let (_config_dir, config) = empty_config();

    sweep()
        .arg("--undo")
        .arg("--config")
        .arg(&config)
        .arg(dir.path())
        .assert()
        .code(1);

    assert!(dir.path().join(".sweep_undo.json").exists());
}

#[test]
fn test_missing_config_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    create_files(dir.path());

    sweep()
        .args(["--dry-run", "--config", "/non/existent/sweep.toml"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Using default categories"));
}

#[test]
fn test_verbose_flag() {
    let dir = tempdir().unwrap();
    create_files(dir.path());
    let (_config_dir, config) = empty_config();

    sweep()
        .args(["-vv", "--dry-run", "--config"])
        .arg(&config)
        .arg(dir.path())
        .assert()
        .success();
}

#[test]
fn test_skipped_record_reported_once() {
    let dir = tempdir().unwrap();
    create_files(dir.path());
    let (_config_dir, config) = empty_config();

    sweep()
        .arg("--config")
        .arg(&config)
        .arg(dir.path())
        .assert()
        .success();
    std::fs::remove_file(dir.path().join("Images/photo.png")).unwrap();

    sweep()
        .arg("--undo")
        .arg("--config")
        .arg(&config)
        .arg(dir.path())
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stdout(predicate::str::contains("file no longer exists"))
        .stderr(predicate::str::contains("file no longer exists").not());

    assert!(dir.path().join("notes.txt").exists());
}
