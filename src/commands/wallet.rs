//! Built-in wallet commands
use super::{Command, ParseResult};
use crate::abi::parse_entry_point;
use crate::codec::parse_bytes;
use crate::environment::{ExecutionEnvironment, ExecutionResult};
use crate::key::WalletKey;
use crate::logging;
use crate::rpc::RpcTransport;
use crate::ui::Formatter;
use crate::{wallet_file, Result, WalletError};
use prost::Message;
use std::fmt;
use std::path::PathBuf;

/// `balance_of` entry point used when the config does not name one
pub const DEFAULT_BALANCE_OF_ENTRY: u32 = 0x5c72_1497;

#[derive(Clone, PartialEq, Message)]
struct BalanceOfArguments {
    #[prost(bytes = "vec", tag = "1")]
    owner: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
struct BalanceOfResult {
    #[prost(uint64, tag = "1")]
    value: u64,
}

/// Check the native token balance at an address
#[derive(Debug)]
pub struct BalanceCommand {
    address: String,
}

impl BalanceCommand {
    pub fn instantiate(mut parsed: ParseResult) -> Command {
        Command::Balance(Self {
            address: parsed.take("address"),
        })
    }

    pub async fn execute<T: RpcTransport>(
        self,
        ee: &mut ExecutionEnvironment<T>,
    ) -> Result<ExecutionResult> {
        let owner = parse_bytes(&self.address)
            .ok()
            .filter(|bytes| !bytes.is_empty())
            .ok_or_else(|| WalletError::InvalidAddress(self.address.clone()))?;

        let token = &ee.token;
        let contract = token.contract.as_deref().ok_or_else(|| {
            WalletError::ContractNotFound(
                "native token (set [token] contract in the config file)".to_string(),
            )
        })?;
        let contract_id = parse_bytes(contract)
            .map_err(|e| WalletError::InvalidAddress(format!("token contract: {}", e)))?;
        let entry_point = match token.balance_of_entry.as_deref() {
            Some(text) => parse_entry_point(text)?,
            None => DEFAULT_BALANCE_OF_ENTRY,
        };

        let args = BalanceOfArguments { owner }.encode_to_vec();
        logging::log_contract_read("balance", entry_point, args.len());
        let bytes = ee.rpc.read_contract(&args, &contract_id, entry_point).await?;
        let balance = BalanceOfResult::decode(bytes.as_slice())
            .map_err(|e| WalletError::Decode(e.to_string()))?;

        let mut result = ExecutionResult::new();
        result.add_message(format!(
            "{} {}",
            Formatter::format_amount(balance.value, token.precision),
            token.symbol
        ));
        Ok(result)
    }
}

#[derive(Debug)]
pub struct CloseCommand;

impl CloseCommand {
    pub fn instantiate(_parsed: ParseResult) -> Command {
        Command::Close(Self)
    }

    pub fn execute<T: RpcTransport>(self, ee: &mut ExecutionEnvironment<T>) -> Result<ExecutionResult> {
        ee.require_key("close a wallet")?;
        ee.key = None;
        logging::log_wallet_closed();

        let mut result = ExecutionResult::new();
        result.add_message("Wallet closed");
        Ok(result)
    }
}

/// Create a wallet file holding a fresh key, then open it
pub struct CreateCommand {
    filename: String,
    password: String,
}

impl CreateCommand {
    pub fn instantiate(mut parsed: ParseResult) -> Command {
        Command::Create(Self {
            filename: parsed.take("filename"),
            password: parsed.take("password"),
        })
    }

    pub fn execute<T: RpcTransport>(self, ee: &mut ExecutionEnvironment<T>) -> Result<ExecutionResult> {
        if self.password.is_empty() {
            return Err(WalletError::EmptyPassphrase);
        }
        let path = PathBuf::from(&self.filename);
        if path.exists() {
            return Err(WalletError::WalletExists(self.filename));
        }

        let key = WalletKey::generate();
        wallet_file::create(&path, &self.password, &key.private_bytes())?;
        logging::log_wallet_opened(&key.address());
        ee.key = Some(key);

        let mut result = ExecutionResult::new();
        result.add_message(format!("Created and opened new wallet: {}", self.filename));
        result.add_message("Use the info command to see details");
        Ok(result)
    }
}

#[derive(Debug)]
pub struct ExitCommand;

impl ExitCommand {
    pub fn instantiate(_parsed: ParseResult) -> Command {
        Command::Exit(Self)
    }

    pub fn execute<T: RpcTransport>(self, _ee: &mut ExecutionEnvironment<T>) -> Result<ExecutionResult> {
        Ok(ExecutionResult::quit())
    }
}

/// Generate a key without storing it anywhere
#[derive(Debug)]
pub struct GenerateKeyCommand;

impl GenerateKeyCommand {
    pub fn instantiate(_parsed: ParseResult) -> Command {
        Command::Generate(Self)
    }

    pub fn execute<T: RpcTransport>(self, _ee: &mut ExecutionEnvironment<T>) -> Result<ExecutionResult> {
        let key = WalletKey::generate();

        let mut result = ExecutionResult::new();
        result.add_message(
            "New key generated. This is only shown once, make sure to record this information.",
        );
        result.add_message(format!("Address: {}", key.address()));
        result.add_message(format!("Private: {}", key.private()));
        Ok(result)
    }
}

#[derive(Debug)]
pub struct HelpCommand;

impl HelpCommand {
    pub fn instantiate(_parsed: ParseResult) -> Command {
        Command::Help(Self)
    }

    pub fn execute<T: RpcTransport>(self, ee: &mut ExecutionEnvironment<T>) -> Result<ExecutionResult> {
        let visible: Vec<_> = ee.commands.iter().filter(|c| !c.hidden).collect();
        let width = visible.iter().map(|c| c.usage().len()).max().unwrap_or(0);

        let mut result = ExecutionResult::new();
        for decl in visible {
            result.add_message(format!(
                "  {:<width$}  {}",
                decl.usage(),
                decl.description,
                width = width
            ));
        }
        Ok(result)
    }
}

#[derive(Debug)]
pub struct InfoCommand;

impl InfoCommand {
    pub fn instantiate(_parsed: ParseResult) -> Command {
        Command::Info(Self)
    }

    pub fn execute<T: RpcTransport>(self, ee: &mut ExecutionEnvironment<T>) -> Result<ExecutionResult> {
        let key = ee.require_key("show wallet info")?;

        let mut result = ExecutionResult::new();
        result.add_message("Wallet information:");
        result.add_message(format!("Address: {}", key.address()));
        result.add_message(format!("Private: {}", key.private()));
        Ok(result)
    }
}

/// Registered contracts and the commands they contributed
#[derive(Debug)]
pub struct ListCommand;

impl ListCommand {
    pub fn instantiate(_parsed: ParseResult) -> Command {
        Command::List(Self)
    }

    pub fn execute<T: RpcTransport>(self, ee: &mut ExecutionEnvironment<T>) -> Result<ExecutionResult> {
        let mut result = ExecutionResult::new();
        if ee.contracts.is_empty() {
            result.add_message("No contracts registered");
            return Ok(result);
        }

        for contract in ee.contracts.iter() {
            result.add_message(format!("{} at {}", contract.name, contract.address));
            for method in &contract.abi.methods {
                let access = if method.read_only { "read" } else { "write" };
                result.add_message(format!("  {}.{} ({})", contract.name, method.name, access));
            }
        }
        Ok(result)
    }
}

pub struct OpenCommand {
    filename: String,
    password: String,
}

impl OpenCommand {
    pub fn instantiate(mut parsed: ParseResult) -> Command {
        Command::Open(Self {
            filename: parsed.take("filename"),
            password: parsed.take("password"),
        })
    }

    pub fn execute<T: RpcTransport>(self, ee: &mut ExecutionEnvironment<T>) -> Result<ExecutionResult> {
        let secret = wallet_file::open(&PathBuf::from(&self.filename), &self.password)?;
        let key = WalletKey::from_bytes(&secret)?;
        logging::log_wallet_opened(&key.address());
        ee.key = Some(key);

        let mut result = ExecutionResult::new();
        result.add_message(format!("Opened wallet: {}", self.filename));
        Ok(result)
    }
}

macro_rules! redacted_debug {
    ($($ty:ident),*) => {$(
        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($ty))
                    .field("filename", &self.filename)
                    .field("password", &"<redacted>")
                    .finish()
            }
        }
    )*};
}

redacted_debug!(CreateCommand, OpenCommand);
