// Integration tests for the gitgrade CLI.
//
// These tests use assert_cmd to invoke the binary and verify
// exit codes and stdout/stderr output. None of them touch the network.

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to build a Command for the gitgrade binary.
fn gitgrade() -> Command {
    Command::cargo_bin("gitgrade").expect("binary should exist")
}

#[test]
fn cli_version_flag() {
    gitgrade()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gitgrade"));
}

#[test]
fn cli_help_flag() {
    gitgrade()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Grade the engineering quality"));
}

#[test]
fn analyze_requires_a_target() {
    gitgrade()
        .arg("analyze")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn empty_url_is_an_input_error() {
    gitgrade()
        .args(["analyze", ""])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("\"error\""))
        .stderr(predicate::str::contains("Repository URL is required"));
}

#[test]
fn malformed_url_is_an_input_error() {
    gitgrade()
        .args(["analyze", "not a url"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid repository reference"));
}

#[test]
fn unsupported_scheme_is_rejected_before_any_network_access() {
    gitgrade()
        .args(["analyze", "ftp://example.com/owner/repo", "--format", "md"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("unsupported scheme"));
}

#[test]
fn unknown_format_is_rejected_by_argument_parsing() {
    gitgrade()
        .args(["analyze", "https://github.com/a/b", "--format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
