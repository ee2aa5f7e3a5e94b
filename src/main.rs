use abi_wallet::cli::{commands, Cli, Commands, Verbosity};
use abi_wallet::config::Config;
use abi_wallet::ui::formatter::Formatter;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn initialize_tracing(verbosity: Verbosity) {
    let log_level = verbosity.to_log_level();
    let fallback_filter = format!("abi_wallet={}", log_level);

    let use_json = std::env::var("ABI_WALLET_JSON").is_ok();

    if use_json {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true);

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| fallback_filter.clone().into()),
            )
            .with(json_layer)
            .init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true);

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| fallback_filter.into()),
            )
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    Formatter::configure_colors_from_env();

    let mut cli = Cli::parse();
    if cli.no_color {
        Formatter::configure_colors(false);
    }
    let verbosity = cli.verbosity();

    initialize_tracing(verbosity);

    if let Some(Commands::Completions(args)) = cli.command.take() {
        return commands::completions(args);
    }

    let config = commands::merge_config(&cli, Config::load_or_default(cli.config.as_deref()));

    if cli.execute.is_empty() {
        commands::interactive(config).await
    } else {
        commands::execute(&cli.execute, config).await
    }
}
