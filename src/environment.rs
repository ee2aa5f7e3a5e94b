//! Execution context shared by every command
use crate::abi::{Abi, SchemaFile};
use crate::commands::{CommandDeclaration, CommandSet, ParseResult};
use crate::config::TokenConfig;
use crate::contracts::ContractRegistry;
use crate::key::WalletKey;
use crate::rpc::RpcTransport;
use crate::{Result, WalletError};
use std::future::Future;
use tracing::{debug, info};

/// Output of one command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    pub messages: Vec<String>,
    /// Set by `exit`; the session should end
    pub quit: bool,
}

impl ExecutionResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quit() -> Self {
        Self {
            messages: Vec::new(),
            quit: true,
        }
    }

    pub fn add_message(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn print(&self) {
        for message in &self.messages {
            println!("{}", message);
        }
    }
}

/// Wallet state: the RPC transport, the open key, registered contracts and
/// the commands the parser knows about
pub struct ExecutionEnvironment<T> {
    pub rpc: T,
    pub key: Option<WalletKey>,
    pub contracts: ContractRegistry,
    pub commands: CommandSet,
    pub token: TokenConfig,
}

impl<T: RpcTransport> ExecutionEnvironment<T> {
    pub fn new(rpc: T, token: TokenConfig) -> Self {
        Self {
            rpc,
            key: None,
            contracts: ContractRegistry::new(),
            commands: CommandSet::with_builtins(),
            token,
        }
    }

    pub fn is_wallet_open(&self) -> bool {
        self.key.is_some()
    }

    /// The open key, or `WalletClosed` naming what needed it
    pub fn require_key(&self, action: &str) -> Result<&WalletKey> {
        self.key
            .as_ref()
            .ok_or_else(|| WalletError::WalletClosed(format!("cannot {}", action)))
    }

    pub fn parse(&self, line: &str) -> Result<ParseResult> {
        self.commands.parse(line)
    }

    /// Parse and run one input line
    pub async fn execute_line(&mut self, line: &str) -> Result<ExecutionResult> {
        let parsed = self.parse(line)?;
        // Arguments may hold passwords; only the name is logged
        debug!(command = parsed.command_name.as_str(), "Executing command");
        let command = self
            .commands
            .get(&parsed.command_name)
            .ok_or_else(|| WalletError::UnknownCommand(parsed.command_name.clone()))?
            .instantiate(parsed);
        command.execute(self).await
    }

    /// Like [`execute_line`](Self::execute_line), but gives up with
    /// `Cancelled` as soon as `cancel` completes
    ///
    /// Commands only mutate the environment after their last await point, so
    /// an abandoned command leaves no partial state behind.
    pub async fn execute_line_or_cancel<F>(&mut self, line: &str, cancel: F) -> Result<ExecutionResult>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            result = self.execute_line(line) => result,
            _ = cancel => Err(WalletError::Cancelled),
        }
    }

    /// Add a contract and its commands as one step
    ///
    /// Every check runs before either structure is touched, so a failure
    /// leaves both the registry and the command set unchanged.
    pub fn install_contract(
        &mut self,
        name: &str,
        address: &str,
        abi: Abi,
        schema: SchemaFile,
        decls: Vec<CommandDeclaration>,
    ) -> Result<()> {
        if self.contracts.contains(name) {
            return Err(WalletError::ContractExists(name.to_string()));
        }
        self.commands.check_available(&decls)?;

        let count = decls.len();
        self.contracts.add(name, address, abi, schema)?;
        self.commands.add_all(decls)?;
        info!(contract = name, address, commands = count, "Contract registered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_messages() {
        let mut result = ExecutionResult::new();
        result.add_message("one");
        result.add_message(String::from("two"));
        assert_eq!(result.messages, vec!["one", "two"]);
        assert!(!result.quit);
        assert!(ExecutionResult::quit().quit);
    }
}
