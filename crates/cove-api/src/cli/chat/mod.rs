//! Interactive chat: one pipeline, and so one entity memory, shared across
//! every question asked in the session.

pub mod banner;
pub mod commands;

use anyhow::Result;
use console::style;
use dialoguer::Input;

use crate::cli::ask::non_blank;
use crate::cli::render::{print_entities, print_turn, turn_spinner};
use crate::state::AppState;

use self::commands::ChatCommand;

pub async fn run_chat(state: &mut AppState, json: bool, quiet: bool) -> Result<()> {
    if !json && !quiet {
        banner::print_welcome_banner(
            &state.config.llm.provider.to_string(),
            &state.config.llm.model,
            &state.pipeline.answer_mode().to_string(),
            state.pipeline.memory().recognizer_name(),
            &state.data_dir.join("config.toml"),
        );
    }

    loop {
        // Ctrl+D / closed stdin ends the session.
        let line = match Input::<String>::new()
            .with_prompt("?")
            .allow_empty(true)
            .interact_text()
        {
            Ok(line) => line,
            Err(e) => {
                tracing::debug!(error = %e, "Input closed, leaving chat");
                break;
            }
        };

        let Some(question) = non_blank(&line) else {
            continue;
        };

        if let Some(command) = commands::parse(question.trim()) {
            match command {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Memory => print_entities(&state.pipeline.memory().entities()),
                ChatCommand::Clear => {
                    state.pipeline.clear_memory();
                    println!("  {} Entity memory cleared", style("✓").green().bold());
                }
                ChatCommand::Exit => break,
                ChatCommand::Unknown(cmd) => {
                    println!(
                        "  {} Unknown command {} (try /help)",
                        style("!").yellow().bold(),
                        style(cmd).bold()
                    );
                }
            }
            continue;
        }

        let spinner = turn_spinner(!json && !quiet)?;
        let result = state.pipeline.run(question).await;
        spinner.finish_and_clear();

        // A failed turn ends that turn only; memory is left as it was.
        match result {
            Ok(turn) => {
                print_turn(&turn, false, json)?;
                println!();
            }
            Err(e) => {
                tracing::error!(error = %e, "Verification turn failed");
                eprintln!("  {} {e}", style("error:").red().bold());
            }
        }
    }

    Ok(())
}
