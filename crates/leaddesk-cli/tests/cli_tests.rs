//! Integration tests for the `leaddesk` CLI binary.
//!
//! These run the CLI as a subprocess against an address where nothing is
//! listening, with `HOME` pointed at a temporary directory. They cover
//! argument handling, client-side validation and the saved-key file.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;
use std::process::Command;

/// Helper: locate the `leaddesk` binary built by `cargo test`.
fn leaddesk_bin() -> String {
    let path = env!("CARGO_BIN_EXE_leaddesk");
    assert!(
        Path::new(path).exists(),
        "leaddesk binary not found at {path}"
    );
    path.to_owned()
}

/// Helper: run leaddesk with args and return (`exit_code`, stdout, stderr).
fn run_in(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(leaddesk_bin())
        .args(args)
        .env("LEADDESK_ADDR", "http://127.0.0.1:19999") // Nothing listens here
        .env_remove("LEADDESK_ADMIN_KEY")
        .env("HOME", home)
        .env("USERPROFILE", home)
        .output()
        .expect("failed to execute leaddesk");

    let code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (code, stdout, stderr)
}

fn run(args: &[&str]) -> (i32, String, String) {
    let home = tempfile::tempdir().unwrap();
    run_in(home.path(), args)
}

// ── Version & help ───────────────────────────────────────────────────

#[test]
fn test_version_flag() {
    let (code, stdout, _) = run(&["--version"]);
    assert_eq!(code, 0, "leaddesk --version should exit 0");
    assert!(stdout.contains("leaddesk"), "version output: {stdout}");
}

#[test]
fn test_help_lists_commands() {
    let (code, stdout, _) = run(&["--help"]);
    assert_eq!(code, 0);
    for cmd in ["submit", "login", "logout", "leads"] {
        assert!(stdout.contains(cmd), "help should mention {cmd}: {stdout}");
    }
}

#[test]
fn test_leads_help_lists_actions() {
    let (code, stdout, _) = run(&["leads", "--help"]);
    assert_eq!(code, 0);
    for cmd in ["list", "show", "delete", "stats"] {
        assert!(stdout.contains(cmd), "leads help should mention {cmd}");
    }
}

#[test]
fn test_unknown_command_fails() {
    let (code, _, _) = run(&["frobnicate"]);
    assert_ne!(code, 0);
}

// ── Submit validation ────────────────────────────────────────────────

#[test]
fn test_submit_rejects_bad_name_before_sending() {
    let (code, _, stderr) = run(&["submit", "--name", "R2D2", "--contact", "12345"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("letters and spaces"), "stderr: {stderr}");
    assert!(!stderr.contains("request failed"), "should not reach the network");
}

#[test]
fn test_submit_rejects_long_contact() {
    let (code, _, stderr) = run(&["submit", "--name", "Priya", "--contact", "123456789012"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("at most 10 digits"), "stderr: {stderr}");
}

#[test]
fn test_submit_reports_missing_resume_file() {
    let (code, _, stderr) = run(&[
        "submit",
        "--name",
        "Priya",
        "--contact",
        "12345",
        "--resume",
        "/nonexistent/cv.pdf",
    ]);
    assert_eq!(code, 1);
    assert!(stderr.contains("failed to read"), "stderr: {stderr}");
}

#[test]
fn test_submit_valid_input_fails_on_unreachable_server() {
    let (code, _, stderr) = run(&["submit", "--name", "Priya Nair", "--contact", "9876543210"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("request failed"), "stderr: {stderr}");
}

// ── Admin key handling ───────────────────────────────────────────────

#[test]
fn test_leads_without_key_explains_login() {
    let (code, _, stderr) = run(&["leads", "list"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("leaddesk login"), "stderr: {stderr}");
}

#[test]
fn test_saved_key_is_used() {
    let home = tempfile::tempdir().unwrap();
    let dir = home.path().join(".leaddesk");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("admin-key"), "saved-key").unwrap();

    // With a key available the CLI gets as far as the network.
    let (code, _, stderr) = run_in(home.path(), &["leads", "stats"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("request failed"), "stderr: {stderr}");
}

#[test]
fn test_login_does_not_save_unverified_key() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, _) = run_in(home.path(), &["login", "--key", "some-key"]);
    assert_eq!(code, 1);
    assert!(!home.path().join(".leaddesk/admin-key").exists());
}

#[test]
fn test_logout_removes_saved_key() {
    let home = tempfile::tempdir().unwrap();
    let dir = home.path().join(".leaddesk");
    fs::create_dir_all(&dir).unwrap();
    let key = dir.join("admin-key");
    fs::write(&key, "saved-key").unwrap();

    let (code, stdout, _) = run_in(home.path(), &["logout"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("removed"), "stdout: {stdout}");
    assert!(!key.exists());

    let (code, stdout, _) = run_in(home.path(), &["logout"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("No saved admin key"), "stdout: {stdout}");
}

#[test]
fn test_delete_with_declined_confirmation_aborts() {
    use std::io::Write as _;
    use std::process::Stdio;

    let home = tempfile::tempdir().unwrap();
    let mut child = Command::new(leaddesk_bin())
        .args(["--admin-key", "k", "leads", "delete", "some-id"])
        .env("LEADDESK_ADDR", "http://127.0.0.1:19999")
        .env("HOME", home.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(b"n\n").unwrap();
    let output = child.wait_with_output().unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Aborted"), "stdout: {stdout}");
}
