use super::common::{TestContext, DEAD_ENDPOINT};
use predicates::prelude::*;

#[test]
fn test_generate_prints_key() {
    let ctx = TestContext::new();
    ctx.cmd()
        .args(["--rpc", DEAD_ENDPOINT, "-x", "generate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Address: 0x"))
        .stdout(predicate::str::contains("Private: "));
}

#[test]
fn test_help_lists_builtins() {
    let ctx = TestContext::new();
    ctx.cmd()
        .args(["--rpc", DEAD_ENDPOINT, "-x", "help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("register <name> <address> <abi-filename>"))
        .stdout(predicate::str::contains("balance <address>"));
}

#[test]
fn test_unknown_command_fails() {
    let ctx = TestContext::new();
    ctx.cmd()
        .args(["--rpc", DEAD_ENDPOINT, "-x", "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown command"));
}

#[test]
fn test_lines_share_one_session() {
    let ctx = TestContext::new();
    ctx.token_abi();
    ctx.cmd()
        .args([
            "--rpc",
            DEAD_ENDPOINT,
            "-x",
            "register token 0x1234 token.abi",
            "-x",
            "create wallet.json secret",
            "-x",
            "list",
            "-x",
            "info",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Contract 'token' at address 0x1234 registered."))
        .stdout(predicate::str::contains("token.transfer (write)"))
        .stdout(predicate::str::contains("Wallet information:"));
    assert!(ctx.path().join("wallet.json").exists());
}

#[test]
fn test_exit_stops_remaining_lines() {
    let ctx = TestContext::new();
    ctx.cmd()
        .args(["--rpc", DEAD_ENDPOINT, "-x", "exit", "-x", "bogus"])
        .assert()
        .success();
}

#[test]
fn test_first_failure_stops_execution() {
    let ctx = TestContext::new();
    ctx.cmd()
        .args(["--rpc", DEAD_ENDPOINT, "-x", "info", "-x", "generate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Address:").not())
        .stderr(predicate::str::contains("No open wallet"));
}

#[test]
fn test_unreachable_node_reports_transport_error() {
    let ctx = TestContext::new();
    ctx.token_abi();
    ctx.cmd()
        .args([
            "--rpc",
            DEAD_ENDPOINT,
            "--timeout",
            "2",
            "-x",
            "register token 0x1234 token.abi",
            "-x",
            "token.balance_of 0xabcd",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("RPC transport error"));
}

#[test]
fn test_balance_needs_token_config() {
    let ctx = TestContext::new();
    ctx.cmd()
        .args(["--rpc", DEAD_ENDPOINT, "-x", "balance 0xabcd"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Contract not found"));
}

#[test]
fn test_config_file_supplies_token() {
    let ctx = TestContext::new();
    ctx.write_config(
        r#"
[rpc]
timeout_secs = 2

[token]
contract = "0x1234"
symbol = "TKN"
"#,
    );
    // The token is configured, so the command gets as far as the node
    ctx.cmd()
        .args(["--rpc", DEAD_ENDPOINT, "-x", "balance 0xabcd"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("RPC transport error"));
}
