use crate::cli::args::{Cli, CompletionsArgs};
use crate::config::Config;
use crate::environment::ExecutionEnvironment;
use crate::logging;
use crate::repl::ReplSession;
use crate::rpc::JsonRpcClient;
use clap::CommandFactory;
use miette::Result;
use std::io;
use std::time::Duration;

/// Apply command line overrides on top of the loaded config
pub fn merge_config(cli: &Cli, mut config: Config) -> Config {
    if let Some(endpoint) = &cli.rpc {
        config.rpc.endpoint = endpoint.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.rpc.timeout_secs = timeout;
    }
    config
}

/// Build the execution environment described by `config`
pub fn environment(config: &Config) -> Result<ExecutionEnvironment<JsonRpcClient>> {
    let client = JsonRpcClient::new(
        config.rpc.endpoint.clone(),
        Duration::from_secs(config.rpc.timeout_secs),
    )?;
    logging::log_session_start(client.endpoint());
    Ok(ExecutionEnvironment::new(client, config.token.clone()))
}

/// Resolves when the user presses Ctrl-C
pub async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No handler could be installed; never cancel
        std::future::pending::<()>().await;
    }
}

/// Run each line in order, stopping at the first failure
pub async fn execute(lines: &[String], config: Config) -> Result<()> {
    let mut ee = environment(&config)?;

    for line in lines {
        match ee.execute_line_or_cancel(line, interrupted()).await {
            Ok(result) => {
                result.print();
                if result.quit {
                    break;
                }
            }
            Err(err) => {
                let command = line.split_whitespace().next().unwrap_or_default();
                logging::log_command_failed(command, &err.to_string());
                return Err(err.into());
            }
        }
    }

    Ok(())
}

/// Start the interactive session
pub async fn interactive(config: Config) -> Result<()> {
    let ee = environment(&config)?;
    let mut session = ReplSession::new(ee, config.repl.history_path())?;
    session.run().await
}

pub fn completions(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "abi-wallet", &mut io::stdout());
    Ok(())
}
