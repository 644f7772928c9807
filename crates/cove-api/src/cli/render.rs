//! Terminal rendering for verification turns.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use cove_types::pipeline::{PipelineTurn, Stage};

/// Spinner shown while a turn is in flight. Hidden in quiet or JSON mode.
pub fn turn_spinner(visible: bool) -> anyhow::Result<ProgressBar> {
    if !visible {
        return Ok(ProgressBar::hidden());
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message("Verifying...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    Ok(spinner)
}

/// Print a completed turn in the requested format.
pub fn print_turn(turn: &PipelineTurn, show_stages: bool, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(turn)?);
        return Ok(());
    }

    if show_stages {
        print_stages(turn);
    }
    println!("{}", turn.final_response.trim());
    Ok(())
}

fn print_stages(turn: &PipelineTurn) {
    if !turn.memory_context.is_empty() {
        print_section("Relevant Context", &turn.memory_context);
    }
    for stage in Stage::ALL {
        if stage == Stage::Finalize {
            println!("{}", style(format!("== {} ==", stage.title())).green().bold());
            continue;
        }
        print_section(stage.title(), turn.stage_output(stage));
    }
}

fn print_section(title: &str, body: &str) {
    println!("{}", style(format!("== {title} ==")).cyan().bold());
    println!("{}", body.trim());
    println!();
}

/// Print the remembered entities, one block per entity.
pub fn print_entities(entities: &[(&str, &str)]) {
    if entities.is_empty() {
        println!("  {}", style("No entities remembered yet.").dim());
        return;
    }
    println!();
    for (entity, context) in entities {
        println!("  {}", style(entity).cyan().bold());
        for line in context.lines() {
            println!("    {}", style(line).dim());
        }
    }
    println!();
}
