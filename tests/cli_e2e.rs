//! CLI end-to-end tests.
//!
//! These tests spawn the actual `tug-selectors` binary and validate stdout,
//! exit codes and the files left behind.
//!
//! Exit code expectations:
//! - 0: Success
//! - 1: `check` found positional selectors
//! - 2: Invalid arguments (bad glob, bad selector pattern, bad --cwd)
//! - 4: One or more templates failed

use std::fs;
use std::path::Path;
use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

/// Run tug-selectors with given arguments and return (stdout, stderr, exit_code).
fn run_tool(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_tug-selectors"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute tug-selectors");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "app/components/widget.hbs",
        "{{widget data-test-widget}}\n",
    );
    write(
        dir.path(),
        "app/templates/index.hbs",
        "{{widget data-test-widget data-test-other class=\"x\"}}\n{{#if data-test-flag}}body{{/if}}\n",
    );
    dir
}

fn cwd(dir: &TempDir) -> &str {
    dir.path().to_str().unwrap()
}

// ============================================================================
// migrate
// ============================================================================

#[test]
fn migrate_rewrites_templates() {
    let dir = project();
    let (stdout, stderr, exit_code) = run_tool(&["migrate", "--cwd", cwd(&dir)]);

    assert_eq!(exit_code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("Migrated 2 of 2 templates"), "{}", stdout);
    assert!(stderr.contains("[1/2] Looking for templates..."), "{}", stderr);
    assert!(stderr.contains("[2/2] Migrating 2 templates..."), "{}", stderr);

    assert_eq!(
        fs::read_to_string(dir.path().join("app/components/widget.hbs")).unwrap(),
        "{{widget data-test-widget=true}}\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("app/templates/index.hbs")).unwrap(),
        "{{widget data-test-widget=true data-test-other=true class=\"x\"}}\n{{#if data-test-flag=true}}body{{/if}}\n"
    );
}

#[test]
fn migrate_json_output() {
    let dir = project();
    let (stdout, _stderr, exit_code) =
        run_tool(&["migrate", "--cwd", cwd(&dir), "--format", "json", "--dry-run"]);

    assert_eq!(exit_code, 0);
    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(json["status"], "ok");
    assert_eq!(json["schema_version"], "1");
    assert_eq!(json["dry_run"], true);
    assert_eq!(json["files_scanned"], 2);
    assert_eq!(json["files_changed"].as_array().unwrap().len(), 2);

    // Dry run leaves files alone.
    assert_eq!(
        fs::read_to_string(dir.path().join("app/components/widget.hbs")).unwrap(),
        "{{widget data-test-widget}}\n"
    );
}

#[test]
fn migrate_dry_run_prints_diff() {
    let dir = project();
    let (stdout, _stderr, exit_code) = run_tool(&[
        "migrate",
        "app/components/**/*.hbs",
        "--cwd",
        cwd(&dir),
        "--dry-run",
    ]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("--- a/app/components/widget.hbs"), "{}", stdout);
    assert!(stdout.contains("+{{widget data-test-widget=true}}"), "{}", stdout);
    assert!(stdout.contains("Would migrate 1 of 1 templates"), "{}", stdout);
}

#[test]
fn migrate_reports_failures_with_exit_4() {
    let dir = project();
    write(dir.path(), "app/components/broken.hbs", "{{/if}}\n");

    let (stdout, _stderr, exit_code) =
        run_tool(&["migrate", "--cwd", cwd(&dir), "--format", "json"]);

    assert_eq!(exit_code, 4);
    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(json["status"], "partial");
    assert_eq!(json["failures"][0]["path"], "app/components/broken.hbs");
    assert_eq!(json["failures"][0]["stage"], "parse");
    assert_eq!(json["files_changed"].as_array().unwrap().len(), 2);
}

#[test]
fn invalid_selector_pattern_exits_2() {
    let dir = project();
    let (stdout, _stderr, exit_code) =
        run_tool(&["migrate", "--cwd", cwd(&dir), "--selector-pattern", "("]);

    assert_eq!(exit_code, 2);
    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(json["status"], "error");
    assert_eq!(json["error"]["code"], "InvalidArguments");
}

#[test]
fn missing_cwd_exits_2() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");
    let (_stdout, _stderr, exit_code) =
        run_tool(&["migrate", "--cwd", missing.to_str().unwrap()]);
    assert_eq!(exit_code, 2);
}

// ============================================================================
// check
// ============================================================================

#[test]
fn check_finds_selectors_and_exits_1() {
    let dir = project();
    let (stdout, _stderr, exit_code) = run_tool(&["check", "--cwd", cwd(&dir)]);

    assert_eq!(exit_code, 1);
    assert!(
        stdout.contains("app/components/widget.hbs:1:10 data-test-widget"),
        "{}",
        stdout
    );
    assert!(stdout.contains("4 positional selectors in 2 templates"), "{}", stdout);
}

#[test]
fn check_is_clean_after_migrate() {
    let dir = project();
    let (_stdout, _stderr, exit_code) = run_tool(&["migrate", "--cwd", cwd(&dir)]);
    assert_eq!(exit_code, 0);

    let (stdout, _stderr, exit_code) =
        run_tool(&["check", "--cwd", cwd(&dir), "--format", "json"]);
    assert_eq!(exit_code, 0);
    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(json["status"], "ok");
    assert_eq!(json["selectors"].as_array().unwrap().len(), 0);
}
