//! REPL session management with history and completion
//!
//! Reads one line at a time, runs it against the execution environment and
//! prints the result. Ctrl-C cancels a running command, Ctrl-D exits.

use super::completer::CommandCompleter;
use crate::cli::commands::interrupted;
use crate::environment::ExecutionEnvironment;
use crate::logging;
use crate::rpc::RpcTransport;
use crate::ui::formatter::Formatter;
use crate::WalletError;
use miette::Result;
use rustyline::error::ReadlineError;
use rustyline::history::FileHistory;
use rustyline::Editor;
use std::path::PathBuf;

/// Commands whose arguments include a password
const SECRET_COMMANDS: &[&str] = &["create", "open"];

/// Whether a line may be written to the history file
pub fn records_history(line: &str) -> bool {
    let first = line.split_whitespace().next().unwrap_or_default();
    !SECRET_COMMANDS.contains(&first)
}

/// A cancelled command is a warning, anything else an error
fn failure_message(error: &WalletError) -> String {
    match error {
        WalletError::Cancelled => Formatter::warning(error.to_string()),
        _ => Formatter::error(format!("Error: {}", error)),
    }
}

/// REPL session state and editor
pub struct ReplSession<T> {
    editor: Editor<CommandCompleter, FileHistory>,
    ee: ExecutionEnvironment<T>,
    history_path: Option<PathBuf>,
}

impl<T: RpcTransport> ReplSession<T> {
    pub fn new(ee: ExecutionEnvironment<T>, history_path: Option<PathBuf>) -> Result<Self> {
        let mut editor = Editor::<CommandCompleter, FileHistory>::new()
            .map_err(|e| miette::miette!("Failed to initialize REPL editor: {}", e))?;
        editor.set_helper(Some(CommandCompleter::default()));

        if let Some(path) = &history_path {
            // Missing history is normal on first run
            let _ = editor.load_history(path);
        }

        let mut session = ReplSession {
            editor,
            ee,
            history_path,
        };
        session.refresh_completions();
        Ok(session)
    }

    /// Run the REPL event loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        loop {
            let prompt = Formatter::prompt(self.ee.is_wallet_open());

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    if records_history(&line) {
                        let _ = self.editor.add_history_entry(line.as_str());
                    }

                    let quit = self.execute_command(&line).await;
                    self.refresh_completions();
                    if quit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", Formatter::info("Use 'exit' or Ctrl+D to quit"));
                }
                Err(ReadlineError::Eof) => {
                    break;
                }
                Err(e) => {
                    self.save_history();
                    return Err(miette::miette!("Failed to read input: {}", e));
                }
            }
        }

        self.save_history();
        Ok(())
    }

    /// Execute a single line, returning true when the session should end
    async fn execute_command(&mut self, line: &str) -> bool {
        match self.ee.execute_line_or_cancel(line, interrupted()).await {
            Ok(result) => {
                result.print();
                result.quit
            }
            Err(e) => {
                let command = line.split_whitespace().next().unwrap_or_default();
                logging::log_command_failed(command, &e.to_string());
                eprintln!("{}", failure_message(&e));
                false
            }
        }
    }

    /// Commands change when contracts are registered
    fn refresh_completions(&mut self) {
        let names = self
            .ee
            .commands
            .iter()
            .filter(|c| !c.hidden)
            .map(|c| c.name.clone())
            .collect();
        if let Some(helper) = self.editor.helper_mut() {
            helper.set_names(names);
        }
    }

    fn save_history(&mut self) {
        if let Some(path) = &self.history_path {
            if let Err(e) = self.editor.save_history(path) {
                tracing::warn!(path = %path.display(), error = %e, "Failed to save history");
            }
        }
    }

    fn print_welcome(&self) {
        println!(
            "{}",
            Formatter::success(format!(
                "abi-wallet {} ({}, {})",
                env!("CARGO_PKG_VERSION"),
                option_env!("GIT_HASH").unwrap_or("unknown"),
                option_env!("RUSTC_VERSION").unwrap_or("rustc unknown")
            ))
        );
        println!("{}", Formatter::info("Type 'help' for available commands"));
        println!();
    }
}
