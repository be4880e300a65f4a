//! End-to-end tests: each test runs the real `vaultstat` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn vaultstat() -> Command {
    Command::new(env!("CARGO_BIN_EXE_vaultstat"))
}

fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn sample_vault() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "A.md", b"Hello world.");
    write(dir.path(), "B.png", &[7u8; 100]);
    write(dir.path(), "C.md", b"One two three four.");
    write(dir.path(), "archive/old.md", b"stale words in an archived note");
    write(dir.path(), ".obsidian/app.json", b"{}");
    dir
}

fn scan_json(args: &[&str], root: &Path) -> serde_json::Value {
    let out = vaultstat()
        .arg("scan")
        .arg(root)
        .args(["--format", "json"])
        .args(args)
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    serde_json::from_slice(&out.stdout).unwrap()
}

// ---------------------------------------------------------------------------
// --version / --help
// ---------------------------------------------------------------------------

#[test]
fn version_flag_prints_version() {
    vaultstat()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("vaultstat"));
}

#[test]
fn help_flag_lists_subcommands() {
    vaultstat()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("watch"));
}

#[test]
fn watch_help_shows_interval_flag() {
    vaultstat()
        .args(["watch", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--interval-ms"))
        .stdout(predicate::str::contains("--deletion"));
}

// ---------------------------------------------------------------------------
// scan
// ---------------------------------------------------------------------------

#[test]
fn scan_prints_markdown_table_by_default() {
    let dir = sample_vault();
    vaultstat()
        .arg("scan")
        .arg(dir.path())
        .args(["--exclude", "archive"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("|Metric|Value|"))
        .stdout(predicate::str::contains("|Files|3|"))
        .stdout(predicate::str::contains("|Documents|2|"))
        .stdout(predicate::str::contains("|Attachments|1|"))
        .stdout(predicate::str::contains("|Words|6|"));
}

#[test]
fn scan_json_counts_every_visible_file() {
    let dir = sample_vault();
    let v = scan_json(&[], dir.path());

    assert_eq!(v["schema_version"], 1);
    assert_eq!(v["tool"]["name"], "vaultstat");
    assert_eq!(v["totals"]["files"], 4);
    assert_eq!(v["totals"]["documents"], 3);
    assert_eq!(v["totals"]["word_count"], 12);
    assert_eq!(v["pass"]["processed"], 4);
}

#[test]
fn scan_exclude_skips_directory_and_reports_it() {
    let dir = sample_vault();
    let v = scan_json(&["--exclude", "archive"], dir.path());

    assert_eq!(v["totals"]["files"], 3);
    assert_eq!(v["totals"]["word_count"], 6);
    assert_eq!(v["totals"]["size_bytes"], 12 + 100 + 19);
    assert_eq!(v["pass"]["excluded"], 1);
}

#[test]
fn scan_reads_vault_settings_file() {
    let dir = sample_vault();
    write(dir.path(), "vaultstat.toml", b"exclude = \"archive\"\nformat = \"json\"\n");

    let out = vaultstat().arg("scan").arg(dir.path()).output().unwrap();
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();

    // vaultstat.toml itself is an attachment
    assert_eq!(v["totals"]["files"], 4);
    assert_eq!(v["totals"]["attachments"], 2);
    assert_eq!(v["totals"]["word_count"], 6);
}

#[test]
fn scan_counts_links_and_tags() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "hub.md",
        b"Links to [[A]], [[B|bee]] and [site](https://example.com). #project #todo\n",
    );
    write(dir.path(), "leaf.md", b"No links here.\n");

    let v = scan_json(&[], dir.path());

    assert_eq!(v["totals"]["link_count"], 3);
    assert_eq!(v["totals"]["tag_count"], 2);
    assert_eq!(v["totals"]["quality"], 1.5);
}

#[test]
fn scan_of_missing_root_fails_with_hint() {
    let dir = TempDir::new().unwrap();
    vaultstat()
        .arg("scan")
        .arg(dir.path().join("absent"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("Verify the vault path"));
}

#[test]
fn scan_with_invalid_settings_file_fails() {
    let dir = sample_vault();
    write(dir.path(), "vaultstat.toml", b"drain_interval_ms = 0\n");
    vaultstat()
        .arg("scan")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("drain_interval_ms"));
}

#[test]
fn scan_rejects_unknown_deletion_policy() {
    let dir = sample_vault();
    vaultstat()
        .arg("scan")
        .arg(dir.path())
        .args(["--deletion", "sometimes"])
        .assert()
        .failure();
}

// ---------------------------------------------------------------------------
// watch
// ---------------------------------------------------------------------------

#[test]
fn watch_prints_initial_status_and_exits_after_deadline() {
    let dir = sample_vault();
    vaultstat()
        .arg("watch")
        .arg(dir.path())
        .args(["--exclude", "archive", "--interval-ms", "50", "--exit-after-ms", "300"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 files (2 notes, 1 attachments)"))
        .stdout(predicate::str::contains("6 words"));
}

#[test]
fn watch_rejects_zero_interval() {
    let dir = sample_vault();
    vaultstat()
        .arg("watch")
        .arg(dir.path())
        .args(["--interval-ms", "0", "--exit-after-ms", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("drain_interval_ms"));
}
