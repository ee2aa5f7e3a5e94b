use crate::{Result, WalletError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".abi-wallet.toml";

pub const DEFAULT_RPC_ENDPOINT: &str = "http://localhost:8080";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub rpc: RpcConfig,
    #[serde(default)]
    pub token: TokenConfig,
    #[serde(default)]
    pub repl: ReplConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// JSON-RPC endpoint of the node
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Native token used by the `balance` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Hex contract id of the token; `balance` is unavailable without it
    #[serde(default)]
    pub contract: Option<String>,
    /// Entry point of `balance_of`, hex or decimal
    #[serde(default)]
    pub balance_of_entry: Option<String>,
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Number of decimal places in a displayed amount
    #[serde(default = "default_precision")]
    pub precision: u32,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            contract: None,
            balance_of_entry: None,
            symbol: default_symbol(),
            precision: default_precision(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReplConfig {
    /// Defaults to `~/.abi_wallet_history`
    #[serde(default)]
    pub history_file: Option<PathBuf>,
}

impl ReplConfig {
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_file
            .clone()
            .or_else(|| dirs::home_dir().map(|home| home.join(".abi_wallet_history")))
    }
}

fn default_endpoint() -> String {
    DEFAULT_RPC_ENDPOINT.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_symbol() -> String {
    "KOIN".to_string()
}

fn default_precision() -> u32 {
    8
}

impl Config {
    /// Load configuration from the default file in the working directory
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Load configuration from `config_path`; a missing file yields defaults
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| {
            WalletError::FileError(format!(
                "Failed to read config file {:?}: {}",
                config_path, e
            ))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            WalletError::FileError(format!(
                "Failed to parse TOML config from {:?}: {}",
                config_path, e
            ))
        })?;

        Ok(config)
    }

    /// Load config, falling back to defaults when the file cannot be parsed
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let result = match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        };

        match result {
            Ok(config) => config,
            Err(e) => {
                warn!("Warning: Failed to load config: {}. Using defaults.", e);
                Config::default()
            }
        }
    }
}
