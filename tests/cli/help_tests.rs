use super::common::cmd;
use predicates::prelude::*;

#[test]
fn test_help_flag() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("abi-wallet"))
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--execute"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_completions_bash() {
    cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("abi-wallet"));
}

#[test]
fn test_verbose_conflicts_with_quiet() {
    cmd().args(["-v", "--quiet"]).assert().failure();
}
