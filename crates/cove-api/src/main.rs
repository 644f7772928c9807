//! Cove CLI entry point.
//!
//! Binary name: `cove`
//!
//! Parses CLI arguments, initializes tracing, resolves config and the API
//! key, then dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;
use secrecy::SecretString;

use cove_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter};

use cli::{Cli, Commands};
use state::{AppState, Overrides};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(verbosity_filter(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "cove", &mut std::io::stdout());
        return Ok(());
    }

    let overrides = Overrides {
        provider: cli.provider,
        model: cli.model,
        temperature: cli.temperature,
        api_key: cli.api_key.map(SecretString::from),
    };
    let mut state = AppState::init(overrides).await?;

    match cli.command {
        Commands::Ask {
            question,
            show_stages,
        } => {
            cli::ask::ask(&mut state, question, show_stages, cli.json, cli.quiet).await?;
        }
        Commands::Chat => {
            cli::chat::run_chat(&mut state, cli.json, cli.quiet).await?;
        }
        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
