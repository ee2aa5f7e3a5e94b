//! Command declarations and dispatch
//!
//! Every command, built in or synthesized from a contract ABI, is described by
//! a [`CommandDeclaration`]: a unique name, the positional arguments it takes
//! and a function that turns a [`ParseResult`] into an executable [`Command`].

pub mod contract;
pub mod parser;
pub mod wallet;

pub use contract::{compile, ReadContractCommand, RegisterCommand, WriteContractCommand};
pub use parser::tokenize;

use crate::environment::{ExecutionEnvironment, ExecutionResult};
use crate::rpc::RpcTransport;
use crate::{Result, WalletError};
use std::collections::HashMap;
use wallet::{
    BalanceCommand, CloseCommand, CreateCommand, ExitCommand, GenerateKeyCommand, HelpCommand,
    InfoCommand, ListCommand, OpenCommand,
};

/// Tokenization hint for a declared argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandArgType {
    Address,
    String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandArg {
    pub name: String,
    pub arg_type: CommandArgType,
}

impl CommandArg {
    pub fn new(name: impl Into<String>, arg_type: CommandArgType) -> Self {
        Self {
            name: name.into(),
            arg_type,
        }
    }
}

/// Builds an executable command from a parsed invocation
pub type Instantiation = fn(ParseResult) -> Command;

#[derive(Debug, Clone)]
pub struct CommandDeclaration {
    pub name: String,
    pub description: String,
    pub args: Vec<CommandArg>,
    pub instantiation: Instantiation,
    /// Hidden commands are not listed by `help`
    pub hidden: bool,
}

impl CommandDeclaration {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        hidden: bool,
        instantiation: Instantiation,
        args: Vec<CommandArg>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            args,
            instantiation,
            hidden,
        }
    }

    pub fn instantiate(&self, parsed: ParseResult) -> Command {
        (self.instantiation)(parsed)
    }

    /// `name <arg> <arg>` form shown in help output
    pub fn usage(&self) -> String {
        let mut usage = self.name.clone();
        for arg in &self.args {
            usage.push_str(&format!(" <{}>", arg.name));
        }
        usage
    }
}

/// A parsed command line: the command name and its arguments by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub command_name: String,
    pub args: HashMap<String, String>,
}

impl ParseResult {
    pub fn new(command_name: impl Into<String>) -> Self {
        Self {
            command_name: command_name.into(),
            args: HashMap::new(),
        }
    }

    /// Remove an argument, yielding an empty string if the parser did not supply it
    pub fn take(&mut self, name: &str) -> String {
        self.args.remove(name).unwrap_or_default()
    }
}

/// All commands known to the parser, in installation order
#[derive(Debug, Default)]
pub struct CommandSet {
    commands: Vec<CommandDeclaration>,
    index: HashMap<String, usize>,
}

impl CommandSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in wallet commands
    pub fn with_builtins() -> Self {
        let mut set = Self::new();
        for decl in build_commands() {
            set.insert(decl);
        }
        set
    }

    fn insert(&mut self, decl: CommandDeclaration) {
        self.index.insert(decl.name.clone(), self.commands.len());
        self.commands.push(decl);
    }

    pub fn add_command(&mut self, decl: CommandDeclaration) -> Result<()> {
        if self.contains(&decl.name) {
            return Err(WalletError::DuplicateCommand(decl.name));
        }
        self.insert(decl);
        Ok(())
    }

    /// Check that a batch of declarations can be installed without collisions,
    /// neither with existing commands nor among themselves
    pub fn check_available(&self, decls: &[CommandDeclaration]) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for decl in decls {
            if self.contains(&decl.name) || !seen.insert(decl.name.as_str()) {
                return Err(WalletError::DuplicateCommand(decl.name.clone()));
            }
        }
        Ok(())
    }

    /// Install a batch of declarations; nothing is installed if any collides
    pub fn add_all(&mut self, decls: Vec<CommandDeclaration>) -> Result<()> {
        self.check_available(&decls)?;
        for decl in decls {
            self.insert(decl);
        }
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&CommandDeclaration> {
        self.index.get(name).map(|&i| &self.commands[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDeclaration> {
        self.commands.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.commands.iter().map(|c| c.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Parse one input line against the declared commands
    pub fn parse(&self, line: &str) -> Result<ParseResult> {
        parser::parse(self, line)
    }
}

/// Built-in command declarations
pub fn build_commands() -> Vec<CommandDeclaration> {
    use CommandArgType::{Address, String};

    vec![
        CommandDeclaration::new(
            "balance",
            "Check the balance at an address",
            false,
            BalanceCommand::instantiate,
            vec![CommandArg::new("address", Address)],
        ),
        CommandDeclaration::new(
            "close",
            "Close the open wallet",
            false,
            CloseCommand::instantiate,
            vec![],
        ),
        CommandDeclaration::new(
            "create",
            "Create and open a new wallet file",
            false,
            CreateCommand::instantiate,
            vec![
                CommandArg::new("filename", String),
                CommandArg::new("password", String),
            ],
        ),
        CommandDeclaration::new(
            "generate",
            "Generate and display a new private key",
            false,
            GenerateKeyCommand::instantiate,
            vec![],
        ),
        CommandDeclaration::new(
            "help",
            "Show the available commands",
            false,
            HelpCommand::instantiate,
            vec![],
        ),
        CommandDeclaration::new(
            "info",
            "Show the currently opened wallet's address / key",
            false,
            InfoCommand::instantiate,
            vec![],
        ),
        CommandDeclaration::new(
            "list",
            "List registered contracts and their commands",
            false,
            ListCommand::instantiate,
            vec![],
        ),
        CommandDeclaration::new(
            "open",
            "Open a wallet file",
            false,
            OpenCommand::instantiate,
            vec![
                CommandArg::new("filename", String),
                CommandArg::new("password", String),
            ],
        ),
        CommandDeclaration::new(
            "register",
            "Register a contract from its ABI file",
            false,
            RegisterCommand::instantiate,
            vec![
                CommandArg::new("name", String),
                CommandArg::new("address", Address),
                CommandArg::new("abi-filename", String),
            ],
        ),
        CommandDeclaration::new(
            "exit",
            "Exit the wallet (quit also works)",
            false,
            ExitCommand::instantiate,
            vec![],
        ),
        CommandDeclaration::new("quit", "", true, ExitCommand::instantiate, vec![]),
    ]
}

/// Executable form of every command
#[derive(Debug)]
pub enum Command {
    Balance(BalanceCommand),
    Close(CloseCommand),
    Create(CreateCommand),
    Exit(ExitCommand),
    Generate(GenerateKeyCommand),
    Help(HelpCommand),
    Info(InfoCommand),
    List(ListCommand),
    Open(OpenCommand),
    Register(RegisterCommand),
    ReadContract(ReadContractCommand),
    WriteContract(WriteContractCommand),
}

impl Command {
    pub async fn execute<T: RpcTransport>(
        self,
        ee: &mut ExecutionEnvironment<T>,
    ) -> Result<ExecutionResult> {
        match self {
            Command::Balance(c) => c.execute(ee).await,
            Command::Close(c) => c.execute(ee),
            Command::Create(c) => c.execute(ee),
            Command::Exit(c) => c.execute(ee),
            Command::Generate(c) => c.execute(ee),
            Command::Help(c) => c.execute(ee),
            Command::Info(c) => c.execute(ee),
            Command::List(c) => c.execute(ee),
            Command::Open(c) => c.execute(ee),
            Command::Register(c) => c.execute(ee),
            Command::ReadContract(c) => c.execute(ee).await,
            Command::WriteContract(c) => c.execute(ee).await,
        }
    }
}
