//! CLI integration tests for pg-crud.
//!
//! These tests verify command-line argument parsing, help output,
//! and exit codes for errors detected before any prompt or connection.

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a command for the pg-crud binary.
fn cmd() -> Command {
    Command::cargo_bin("pg-crud").unwrap()
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_shows_connection_flags() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--host"))
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--user"))
        .stdout(predicate::str::contains("--database"))
        .stdout(predicate::str::contains("--sslmode"))
        .stdout(predicate::str::contains("--schema"));
}

#[test]
fn test_help_has_no_password_flag() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--password").not());
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pg-crud"));
}

// =============================================================================
// Defaults
// =============================================================================

#[test]
fn test_connection_defaults() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("[default: localhost]"))
        .stdout(predicate::str::contains("[default: 5432]"))
        .stdout(predicate::str::contains("[default: disable]"))
        .stdout(predicate::str::contains("[default: public]"));
}

#[test]
fn test_log_flags() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--log-format"))
        .stdout(predicate::str::contains("[default: text]"))
        .stdout(predicate::str::contains("--verbosity"))
        .stdout(predicate::str::contains("[default: warn]"));
}

#[test]
fn test_strict_flag_exists() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--strict"));
}

// =============================================================================
// Exit Code Tests - Config Errors (Exit Code 1)
// =============================================================================

#[test]
fn test_invalid_sslmode_exits_with_code_1() {
    cmd()
        .args(["--sslmode", "prefer", "--user", "app", "--database", "shop"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid sslmode 'prefer'"));
}

#[test]
fn test_invalid_log_format_exits_with_code_1() {
    cmd()
        .args(["--log-format", "xml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid log format"));
}

#[test]
fn test_invalid_verbosity_exits_with_code_1() {
    cmd()
        .args(["--verbosity", "loud"])
        .assert()
        .code(1);
}

// =============================================================================
// Argument Parsing
// =============================================================================

#[test]
fn test_non_numeric_port_is_rejected() {
    cmd()
        .args(["--port", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--port"));
}

#[test]
fn test_unknown_flag_shows_usage() {
    cmd()
        .arg("--password")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}
