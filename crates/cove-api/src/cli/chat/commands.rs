//! Slash command parsing for the chat loop.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// List the remembered entities.
    Memory,
    /// Forget every remembered entity.
    Clear,
    /// Leave the chat.
    Exit,
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let cmd = trimmed
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase();

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/memory" | "/mem" => Some(ChatCommand::Memory),
        "/clear" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Print the help text listing all available commands.
pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!("  {}    Show this help message", style("/help").cyan());
    println!("  {}  List remembered entities and their context", style("/memory").cyan());
    println!("  {}   Forget all remembered entities", style("/clear").cyan());
    println!("  {}    Leave the chat", style("/exit").cyan());
    println!();
    println!("  {}", style("Ctrl+D also exits").dim());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_help() {
        assert_eq!(parse("/help"), Some(ChatCommand::Help));
        assert_eq!(parse("/h"), Some(ChatCommand::Help));
        assert_eq!(parse("/?"), Some(ChatCommand::Help));
    }

    #[test]
    fn test_parse_memory_and_clear() {
        assert_eq!(parse("/memory"), Some(ChatCommand::Memory));
        assert_eq!(parse("  /MEM  "), Some(ChatCommand::Memory));
        assert_eq!(parse("/clear"), Some(ChatCommand::Clear));
    }

    #[test]
    fn test_parse_exit() {
        assert_eq!(parse("/exit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/quit now"), Some(ChatCommand::Exit));
        assert_eq!(parse("/q"), Some(ChatCommand::Exit));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            parse("/history"),
            Some(ChatCommand::Unknown("/history".to_string()))
        );
    }

    #[test]
    fn test_parse_not_command() {
        assert_eq!(parse("What causes tides?"), None);
    }
}
