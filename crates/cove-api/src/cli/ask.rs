//! `cove ask`: one question, one verified answer.

use anyhow::{Result, bail};
use dialoguer::Input;

use crate::cli::render::{print_turn, turn_spinner};
use crate::state::AppState;

pub async fn ask(
    state: &mut AppState,
    question: Option<String>,
    show_stages: bool,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let question = match question {
        Some(q) => q,
        None => Input::<String>::new()
            .with_prompt("Enter a question")
            .interact_text()?,
    };
    let Some(question) = non_blank(&question) else {
        bail!("question must not be empty");
    };

    let spinner = turn_spinner(!json && !quiet)?;
    let result = state.pipeline.run(question).await;
    spinner.finish_and_clear();

    let turn = result?;
    print_turn(&turn, show_stages, json)
}

/// The question exactly as typed, or `None` if it is only whitespace.
///
/// The text is not trimmed: entity memory records what the user asked.
pub(crate) fn non_blank(question: &str) -> Option<&str> {
    if question.trim().is_empty() {
        None
    } else {
        Some(question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank_keeps_surrounding_whitespace() {
        assert_eq!(non_blank("  Is Paris old? "), Some("  Is Paris old? "));
    }

    #[test]
    fn test_non_blank_rejects_whitespace_only() {
        assert_eq!(non_blank(""), None);
        assert_eq!(non_blank(" \t\n"), None);
    }
}
