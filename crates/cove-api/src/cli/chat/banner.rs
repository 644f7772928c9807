//! Welcome banner display for chat sessions.

use std::path::Path;

use console::style;

/// Print the welcome banner at the start of a chat session.
pub fn print_welcome_banner(
    provider: &str,
    model: &str,
    answer_mode: &str,
    recognizer: &str,
    config_path: &Path,
) {
    println!();
    println!(
        "  {} {}",
        style("✓").green().bold(),
        style("Chain-of-Verification").cyan().bold()
    );
    println!();
    println!("  {}     {} / {}", style("Model:").bold(), provider, style(model).dim());
    println!("  {}   {}", style("Answers:").bold(), style(answer_mode).dim());
    println!("  {}  {}", style("Entities:").bold(), style(recognizer).dim());
    println!("  {}    {}", style("Config:").bold(), style(config_path.display()).dim());
    println!();
    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
    println!();
}
