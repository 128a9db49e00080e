//! Tests for list-files, status and clean

mod common;

use common::TestWorkspace;
use predicates::prelude::*;

fn workspace_with_pdfs() -> TestWorkspace {
    let ws = TestWorkspace::new().unwrap();
    ws.write_pdf("papers/done.pdf").unwrap();
    ws.write_pdf("papers/todo.pdf").unwrap();
    ws.adn()
        .args(["gen-md-from-pdf", "papers/done.pdf"])
        .assert()
        .success();
    ws
}

#[test]
fn list_files_hides_processed_by_default() {
    let ws = workspace_with_pdfs();

    ws.adn()
        .args(["list-files", "papers"])
        .assert()
        .success()
        .stdout(predicate::str::contains("todo.pdf"))
        .stdout(predicate::str::contains("pending"))
        .stdout(predicate::str::contains("done.pdf").not());

    ws.adn()
        .args(["list-files", "papers", "--processed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("done.pdf"))
        .stdout(predicate::str::contains("processed"));
}

#[test]
fn list_files_missing_directory_fails() {
    let ws = TestWorkspace::new().unwrap();
    ws.adn()
        .args(["list-files", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn status_counts_processed_and_stages() {
    let ws = workspace_with_pdfs();

    ws.adn()
        .args(["review", "set", "papers/done_extraccion.md", "--first", "approved"])
        .assert()
        .success();

    ws.adn()
        .args(["status", "papers"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed"))
        .stdout(predicate::str::contains("50%"))
        .stdout(predicate::str::contains("• todo.pdf"))
        .stdout(predicate::str::contains("in_second_review"));
}

#[test]
fn clean_dry_run_then_force() {
    let ws = TestWorkspace::new().unwrap();
    ws.write("scratch.tmp", "x").unwrap();
    ws.write("draft.md~", "x").unwrap();
    ws.write(".adn_cache/entry", "x").unwrap();
    ws.write("keep.md", "x").unwrap();

    ws.adn()
        .args(["clean", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 3 temporary files"));
    assert!(ws.path().join("scratch.tmp").exists());

    ws.adn()
        .args(["clean", "-f"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 3 temporary files"));
    assert!(!ws.path().join("scratch.tmp").exists());
    assert!(!ws.path().join(".adn_cache/entry").exists());
    assert!(ws.path().join("keep.md").exists());
}

#[test]
fn clean_without_terminal_needs_force() {
    let ws = TestWorkspace::new().unwrap();
    ws.write("scratch.tmp", "x").unwrap();

    ws.adn()
        .arg("clean")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    assert!(ws.path().join("scratch.tmp").exists());
}
