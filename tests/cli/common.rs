use abi_wallet_mock::token_abi;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Endpoint nothing listens on
pub const DEAD_ENDPOINT: &str = "http://127.0.0.1:9";

/// A scratch working directory for one invocation
pub struct TestContext {
    pub temp_dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write the sample token ABI into the working directory
    pub fn token_abi(&self) -> PathBuf {
        token_abi().write_to(self.path(), "token.abi")
    }

    pub fn write_config(&self, content: &str) -> PathBuf {
        let path = self.path().join(".abi-wallet.toml");
        std::fs::write(&path, content).expect("Failed to write config");
        path
    }

    /// The binary, run inside the context directory
    pub fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = cmd();
        cmd.current_dir(self.path());
        cmd
    }
}

#[allow(deprecated)]
pub fn cmd() -> assert_cmd::Command {
    let mut cmd =
        assert_cmd::Command::cargo_bin("abi-wallet").expect("Failed to find abi-wallet binary");
    cmd.env("NO_COLOR", "1")
        .env_remove("ABI_WALLET_RPC")
        .env_remove("ABI_WALLET_JSON")
        .env_remove("RUST_LOG");
    cmd
}
