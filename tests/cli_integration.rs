//! Integration tests for the command-line interface
//!
//! Runs the built binary against temp copies of the fixture keymap

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_keymap-patcher"));
    cmd.env("NO_COLOR", "1").env_remove("KEYMAP_PATCHER_CONFIG");
    cmd
}

/// Helper to place the fixture keymap in a temp dir
fn setup_keymap() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keymap.c");
    fs::copy("tests/fixtures/keymap.c", &path).unwrap();
    (dir, path)
}

fn run(args: &[&Path]) -> Output {
    bin().args(args).output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_help() {
    let output = bin().arg("--help").output().unwrap();

    assert!(output.status.success());
    assert!(stdout(&output).contains("Inject a custom tap dance"));
}

#[test]
fn test_no_arguments_is_usage_error() {
    let output = bin().output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(!output.stderr.is_empty());
}

#[test]
fn test_extra_argument_is_usage_error() {
    let (_dir, path) = setup_keymap();
    let original = fs::read_to_string(&path).unwrap();

    let output = bin().arg(&path).arg("other.c").output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_patch_reports_each_step() {
    let (_dir, path) = setup_keymap();

    let output = run(&[&path]);
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.contains("✓ Added DANCE_5 to tap_dance_codes enum"));
    assert!(out.contains("✓ Updated dance_state array to size 6"));
    assert!(out.contains("✓ Injected dance_5 functions"));
    assert!(out.contains("✓ Added dance_5 to tap_dance_actions"));
    assert!(out.contains("✓ Replaced KC_SPACE key with TD(DANCE_5) in Layer 0"));
    assert!(out.contains(&format!("✅ Patching complete: {}", path.display())));

    let patched = fs::read_to_string(&path).unwrap();
    assert!(patched.contains("TD(DANCE_5)"));
}

#[test]
fn test_second_run_prints_only_matched_steps() {
    let (_dir, path) = setup_keymap();

    assert!(run(&[&path]).status.success());
    let after_first = fs::read_to_string(&path).unwrap();

    let output = run(&[&path]);
    assert!(output.status.success());

    // Only the array declaration still matches; the other steps are silent
    let out = stdout(&output);
    let step_lines: Vec<&str> = out.lines().filter(|l| l.starts_with('✓')).collect();
    assert_eq!(step_lines, vec!["✓ Updated dance_state array to size 6"]);
    assert!(!out.contains("⊙"));
    assert!(!out.contains("already"));
    assert!(out.contains("✅ Patching complete"));
    assert_eq!(fs::read_to_string(&path).unwrap(), after_first);
}

#[test]
fn test_large_array_still_reported() {
    let (_dir, path) = setup_keymap();
    let input = fs::read_to_string(&path)
        .unwrap()
        .replace("dance_state[2];", "dance_state[9];");
    fs::write(&path, input).unwrap();

    let output = run(&[&path]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("✓ Updated dance_state array to size 9"));
}

#[test]
fn test_check_leaves_file_untouched() {
    let (_dir, path) = setup_keymap();
    let original = fs::read_to_string(&path).unwrap();

    let output = bin().arg(&path).arg("--check").output().unwrap();
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.contains("Would apply: Added DANCE_5 to tap_dance_codes enum"));
    assert!(out.contains("Check complete (file not written):"));
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_diff_shows_changes() {
    let (_dir, path) = setup_keymap();

    let output = bin().arg(&path).arg("--diff").output().unwrap();
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.contains("(original)"));
    assert!(out.contains("+  DANCE_5,"));
    assert!(out.contains("-static tap dance_state[2];"));
    assert!(out.contains("+static tap dance_state[6];"));
}

#[test]
fn test_custom_config_file() {
    let (dir, path) = setup_keymap();
    let config = dir.path().join("dance.toml");
    fs::write(
        &config,
        r#"
index = 3
layer = 1

[gesture]
held_key = "KC_LEFT_SHIFT"
"#,
    )
    .unwrap();

    let output = bin()
        .arg(&path)
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.contains("Updated dance_state array to size 4"));
    assert!(out.contains("Replaced KC_SPACE key with TD(DANCE_3) in Layer 1"));

    let patched = fs::read_to_string(&path).unwrap();
    assert!(patched.contains("register_code16(KC_LEFT_SHIFT);"));
}

#[test]
fn test_config_from_environment() {
    let (dir, path) = setup_keymap();
    let config = dir.path().join("dance.toml");
    fs::write(&config, "index = 4\n").unwrap();

    let output = bin()
        .arg(&path)
        .env("KEYMAP_PATCHER_CONFIG", &config)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).contains("Added DANCE_4 to tap_dance_codes enum"));
}

#[test]
fn test_missing_environment_config_fails() {
    let (dir, path) = setup_keymap();
    let original = fs::read_to_string(&path).unwrap();

    let output = bin()
        .arg(&path)
        .env("KEYMAP_PATCHER_CONFIG", dir.path().join("absent.toml"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("absent.toml"));
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_invalid_config_fails() {
    let (dir, path) = setup_keymap();
    let original = fs::read_to_string(&path).unwrap();
    let config = dir.path().join("dance.toml");
    fs::write(&config, "index = 5\nunknown_key = true\n").unwrap();

    let output = bin()
        .arg(&path)
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("dance.toml"));
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_missing_keymap_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.c");

    let output = run(&[&path]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.c"));
}
