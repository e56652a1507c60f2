//! Integration tests for the unlatch CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;
use zip::unstable::write::FileOptionsExt;
use zip::write::SimpleFileOptions;

/// Binary isolated from the developer's own config files and environment
fn unlatch(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("unlatch").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("RUST_LOG")
        .env_remove("UNLATCH_SEARCH__LENGTH")
        .env_remove("UNLATCH_SEARCH__WORKERS");
    cmd
}

fn write_encrypted_zip(path: &Path, password: &str) {
    let file = fs::File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default().with_deprecated_encryption(password.as_bytes());
    writer.start_file("storage_key.txt", options).unwrap();
    writer
        .write_all(b"emergency storage key: 7f3a-19c2-b004")
        .unwrap();
    writer.finish().unwrap();
}

/// Test CLI binary exists and responds to --help
#[test]
fn test_cli_help() {
    let temp_dir = TempDir::new().unwrap();
    unlatch(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("likely password shapes first"))
        .stdout(predicate::str::contains("crack"))
        .stdout(predicate::str::contains("plan"));
}

/// Test CLI responds to --version
#[test]
fn test_cli_version() {
    let temp_dir = TempDir::new().unwrap();
    unlatch(temp_dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("unlatch"));
}

/// Test invalid subcommand shows error
#[test]
fn test_invalid_subcommand() {
    let temp_dir = TempDir::new().unwrap();
    unlatch(temp_dir.path())
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_crack_recovers_password() {
    let temp_dir = TempDir::new().unwrap();
    write_encrypted_zip(&temp_dir.path().join("vault.zip"), "ab3");

    unlatch(temp_dir.path())
        .args(["crack", "vault.zip", "--length", "3", "-j", "2", "-o", "found.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ab3"))
        .stdout(predicate::str::contains("Saved to found.txt"));

    let saved = fs::read_to_string(temp_dir.path().join("found.txt")).unwrap();
    assert_eq!(saved, "ab3\n");
}

#[test]
fn test_crack_quiet_prints_only_password() {
    let temp_dir = TempDir::new().unwrap();
    write_encrypted_zip(&temp_dir.path().join("vault.zip"), "042");

    unlatch(temp_dir.path())
        .args(["-q", "crack", "vault.zip", "--length", "3"])
        .assert()
        .success()
        .stdout("042\n");

    // Default output file from the embedded configuration
    let saved = fs::read_to_string(temp_dir.path().join("password.txt")).unwrap();
    assert_eq!(saved, "042\n");
}

#[test]
fn test_crack_length_from_project_config() {
    let temp_dir = TempDir::new().unwrap();
    write_encrypted_zip(&temp_dir.path().join("vault.zip"), "7z");
    fs::write(
        temp_dir.path().join("unlatch.toml"),
        "[search]\nlength = 2\n\n[output]\npassword_file = \"pin.txt\"\n",
    )
    .unwrap();

    unlatch(temp_dir.path())
        .args(["crack", "vault.zip"])
        .assert()
        .success();

    let saved = fs::read_to_string(temp_dir.path().join("pin.txt")).unwrap();
    assert_eq!(saved, "7z\n");
}

#[test]
fn test_crack_missing_archive_fails() {
    let temp_dir = TempDir::new().unwrap();

    unlatch(temp_dir.path())
        .args(["crack", "emergency_storage_key.zip", "--length", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot open archive"));

    assert!(!temp_dir.path().join("password.txt").exists());
}

#[test]
fn test_crack_not_found_fails() {
    let temp_dir = TempDir::new().unwrap();
    // Uppercase is outside every stage's alphabet
    write_encrypted_zip(&temp_dir.path().join("vault.zip"), "A");

    unlatch(temp_dir.path())
        .args(["crack", "vault.zip", "--length", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    assert!(!temp_dir.path().join("password.txt").exists());
}

#[test]
fn test_crack_rejects_plain_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("notes.zip"), "just some text").unwrap();

    unlatch(temp_dir.path())
        .args(["crack", "notes.zip", "--length", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid archive"));
}

#[test]
fn test_plan_lists_stages() {
    let temp_dir = TempDir::new().unwrap();

    unlatch(temp_dir.path())
        .args(["plan", "--length", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("letters2-digits1"))
        .stdout(predicate::str::contains("digits1-letters2"))
        .stdout(predicate::str::contains("exhaustive"))
        .stdout(predicate::str::contains("66376"));
}

#[test]
fn test_plan_json() {
    let temp_dir = TempDir::new().unwrap();

    let output = unlatch(temp_dir.path())
        .args(["plan", "--length", "2", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["length"], 2);
    assert_eq!(plan["stages"].as_array().unwrap().len(), 4);
    assert_eq!(plan["stages"][0]["name"], "digits");
    assert_eq!(plan["stages"][0]["record_tried"], true);
    assert_eq!(plan["stages"][3]["skip_tried"], true);
    assert_eq!(plan["total_candidates"], 100 + 260 + 260 + 1296);
}

#[test]
fn test_plan_custom_stages_from_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("custom.toml");
    fs::write(
        &config_path,
        r#"
[search]
length = 4

[[stages]]
name = "years"
segments = [{ alphabet = "digits", length = 4 }]
record_tried = true
"#,
    )
    .unwrap();

    unlatch(temp_dir.path())
        .args(["plan", "--json", "--config"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"years\""))
        .stdout(predicate::str::contains("\"exhaustive\""))
        .stdout(predicate::str::contains("letters").not());
}

#[test]
fn test_config_show() {
    let temp_dir = TempDir::new().unwrap();

    unlatch(temp_dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[search]"))
        .stdout(predicate::str::contains("chunk_size = 512"));

    unlatch(temp_dir.path())
        .args(["config", "get", "search.length"])
        .env("UNLATCH_SEARCH__LENGTH", "5")
        .assert()
        .success()
        .stdout("5\n");
}
