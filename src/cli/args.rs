use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "abi-wallet")]
#[command(about = "An interactive wallet that turns contract ABIs into commands", long_about = None)]
#[command(version)]
pub struct Cli {
    /// JSON-RPC endpoint of the node (overrides the config file)
    #[arg(long, value_name = "URL", env = "ABI_WALLET_RPC")]
    pub rpc: Option<String>,

    /// RPC request timeout in seconds (overrides the config file)
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Path to the config file (defaults to ./.abi-wallet.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Run a wallet command line instead of starting the REPL (repeatable, runs in order)
    #[arg(short = 'x', long = "execute", value_name = "LINE")]
    pub execute: Vec<String>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Log verbosity selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    Trace,
}

impl Verbosity {
    pub fn to_log_level(self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "debug",
            Verbosity::Trace => "trace",
        }
    }
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            return Verbosity::Quiet;
        }
        match self.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Trace,
        }
    }
}
