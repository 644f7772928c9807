//! CLI command definitions for the `cove` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod ask;
pub mod chat;
pub mod credential;
pub mod render;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use cove_types::llm::ProviderType;

/// Answer questions with Chain-of-Verification: draft, plan checks, answer
/// them, then give a verified response.
#[derive(Parser)]
#[command(name = "cove", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors and answers.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    /// Not allowed with `--json`, since both write to stdout.
    #[arg(long, global = true, conflicts_with = "json")]
    pub otel: bool,

    /// LLM provider (openai, gemini, mistral, openai_compatible, anthropic).
    #[arg(long, global = true)]
    pub provider: Option<ProviderType>,

    /// Model identifier, overriding config.toml.
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Sampling temperature for every stage (0.0 - 2.0).
    #[arg(long, global = true)]
    pub temperature: Option<f64>,

    /// API key. Prefer the provider's environment variable or the prompt.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask one question and print the verified answer.
    Ask {
        /// The question. Prompted for when omitted.
        question: Option<String>,

        /// Print every intermediate stage, not just the final response.
        #[arg(long)]
        show_stages: bool,
    },

    /// Ask several questions in a row, sharing entity memory between them.
    Chat,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_ask_with_overrides() {
        let cli = Cli::parse_from([
            "cove",
            "--provider",
            "anthropic",
            "--temperature",
            "0.2",
            "ask",
            "What causes tides?",
            "--show-stages",
        ]);
        assert_eq!(cli.provider, Some(ProviderType::Anthropic));
        assert_eq!(cli.temperature, Some(0.2));
        match cli.command {
            Commands::Ask {
                question,
                show_stages,
            } => {
                assert_eq!(question.as_deref(), Some("What causes tides?"));
                assert!(show_stages);
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_rejects_unknown_provider() {
        assert!(Cli::try_parse_from(["cove", "--provider", "bedrock", "chat"]).is_err());
    }

    #[test]
    fn test_otel_conflicts_with_json() {
        assert!(Cli::try_parse_from(["cove", "--json", "--otel", "chat"]).is_err());
        assert!(Cli::try_parse_from(["cove", "--otel", "chat"]).is_ok());
    }

    #[test]
    fn test_counts_verbosity() {
        let cli = Cli::parse_from(["cove", "-vv", "chat"]);
        assert_eq!(cli.verbose, 2);
    }
}
