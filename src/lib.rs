pub mod abi;
pub mod cli;
pub mod codec;
pub mod commands;
pub mod config;
pub mod contracts;
pub mod environment;
pub mod key;
pub mod logging;
pub mod repl;
pub mod rpc;
pub mod ui;
pub mod wallet_file;
use miette::Diagnostic;

pub use abi::{Abi, AbiMethod};
pub use commands::{CommandDeclaration, CommandSet, ParseResult};
pub use contracts::{Contract, ContractRegistry};
pub use environment::{ExecutionEnvironment, ExecutionResult};
pub use rpc::{JsonRpcClient, RpcTransport};

/// Result type alias for the wallet
pub type Result<T> = std::result::Result<T, WalletError>;

/// Error types for the wallet
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum WalletError {
    #[error("Invalid ABI: {0}")]
    #[diagnostic(
        code(wallet::invalid_abi),
        help("The ABI file must be JSON with a `methods` list and a base64 `types` field holding exactly one serialized protobuf file descriptor.")
    )]
    InvalidAbi(String),

    #[error("Invalid schema: {0}")]
    #[diagnostic(code(wallet::invalid_schema))]
    InvalidSchema(String),

    #[error("Type not found: {0}")]
    #[diagnostic(code(wallet::type_not_found))]
    TypeNotFound(String),

    #[error("Contract already exists: {0}")]
    #[diagnostic(
        code(wallet::contract_exists),
        help("Contract names must be unique. Use `list` to see registered contracts.")
    )]
    ContractExists(String),

    #[error("Contract not found: {0}")]
    #[diagnostic(code(wallet::contract_not_found))]
    ContractNotFound(String),

    #[error("Method not found: {0}")]
    #[diagnostic(code(wallet::method_not_found))]
    MethodNotFound(String),

    #[error("Duplicate command: {0}")]
    #[diagnostic(code(wallet::duplicate_command))]
    DuplicateCommand(String),

    #[error("Unknown command: {0}")]
    #[diagnostic(
        code(wallet::unknown_command),
        help("Type `help` for the list of available commands.")
    )]
    UnknownCommand(String),

    #[error("Empty command name")]
    #[diagnostic(code(wallet::empty_command_name))]
    EmptyCommandName,

    #[error("Not enough arguments for {command}: expected {expected}, got {got}")]
    #[diagnostic(code(wallet::not_enough_arguments))]
    NotEnoughArguments {
        command: String,
        expected: usize,
        got: usize,
    },

    #[error("Missing parameter: {0}")]
    #[diagnostic(code(wallet::missing_param))]
    MissingParam(String),

    #[error("Invalid string: {0}")]
    #[diagnostic(
        code(wallet::invalid_string),
        help("Check that every opening quote has a matching closing quote.")
    )]
    InvalidString(String),

    #[error("No open wallet: {0}")]
    #[diagnostic(
        code(wallet::wallet_closed),
        help("Open a wallet with `open <filename> <password>` or create one with `create`.")
    )]
    WalletClosed(String),

    #[error("Wallet already exists: {0}")]
    #[diagnostic(code(wallet::wallet_exists))]
    WalletExists(String),

    #[error("Failed to decrypt wallet: {0}")]
    #[diagnostic(code(wallet::decrypt_failed))]
    WalletDecrypt(String),

    #[error("Passphrase cannot be empty")]
    #[diagnostic(code(wallet::empty_passphrase))]
    EmptyPassphrase,

    #[error("Invalid key: {0}")]
    #[diagnostic(code(wallet::invalid_key))]
    InvalidKey(String),

    #[error("Invalid address: {0}")]
    #[diagnostic(
        code(wallet::invalid_address),
        help("Addresses are hex strings, optionally prefixed with 0x.")
    )]
    InvalidAddress(String),

    #[error("RPC transport error: {0}")]
    #[diagnostic(
        code(wallet::transport),
        help("Check that the node is reachable at the configured --rpc endpoint, then retry the command.")
    )]
    Transport(String),

    #[error("RPC error ({code}): {message}")]
    #[diagnostic(code(wallet::rpc))]
    Rpc { code: i64, message: String },

    #[error("Command cancelled")]
    #[diagnostic(code(wallet::cancelled), help("The command can be retried."))]
    Cancelled,

    #[error("Failed to decode response: {0}")]
    #[diagnostic(code(wallet::decode))]
    Decode(String),

    #[error("File operation failed: {0}")]
    #[diagnostic(
        code(wallet::file_error),
        help("Check if you have necessary permissions and that the path exists.")
    )]
    FileError(String),
}
