//! Splitting a verification plan into discrete questions.
//!
//! Models format plans loosely: numbered lists, bullets, `Q1:` prefixes and
//! the occasional heading. One question per non-empty line after markers are
//! stripped; lines ending in `:` are headings and dropped. A plan with text
//! but no surviving line is treated as a single question.

const BULLETS: &[char] = &['-', '*', '•', '+'];

pub fn split_verification_questions(plan: &str) -> Vec<String> {
    let trimmed = plan.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let questions: Vec<String> = trimmed
        .lines()
        .map(strip_marker)
        .filter(|line| !line.is_empty() && !line.ends_with(':'))
        .map(str::to_string)
        .collect();

    if questions.is_empty() {
        vec![trimmed.to_string()]
    } else {
        questions
    }
}

/// Remove a leading bullet, `1.`, `1)`, `Q1:` or `Question 1:` marker.
fn strip_marker(line: &str) -> &str {
    let line = line.trim();

    if let Some(rest) = line.strip_prefix(BULLETS) {
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            return rest.trim_start();
        }
    }

    let unprefixed = ["Question", "question", "Q", "q"]
        .iter()
        .find_map(|prefix| line.strip_prefix(prefix))
        .map(str::trim_start)
        .unwrap_or(line);

    let digits = unprefixed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unprefixed.len());
    if digits == 0 {
        return line;
    }

    match unprefixed[digits..].strip_prefix(['.', ')', ':']) {
        Some(rest) => rest.trim_start(),
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_numbered_list() {
        let plan = "1. When was the Eiffel Tower built?\n2) Who designed it?\n\n3. How tall is it?";
        assert_eq!(
            split_verification_questions(plan),
            vec![
                "When was the Eiffel Tower built?",
                "Who designed it?",
                "How tall is it?"
            ]
        );
    }

    #[test]
    fn test_strips_bullets_and_q_prefixes() {
        let plan = "- Is Paris in France?\n* Is it the capital?\nQ3: Since when?\nQuestion 4: Why?";
        assert_eq!(
            split_verification_questions(plan),
            vec!["Is Paris in France?", "Is it the capital?", "Since when?", "Why?"]
        );
    }

    #[test]
    fn test_drops_headings() {
        let plan = "Verification Questions:\n1. Is the moon involved?";
        assert_eq!(split_verification_questions(plan), vec!["Is the moon involved?"]);
    }

    #[test]
    fn test_keeps_words_starting_with_q() {
        assert_eq!(
            split_verification_questions("Quebec is in Canada?"),
            vec!["Quebec is in Canada?"]
        );
    }

    #[test]
    fn test_years_are_not_list_markers() {
        assert_eq!(
            split_verification_questions("1889 was the opening year?"),
            vec!["1889 was the opening year?"]
        );
    }

    #[test]
    fn test_heading_only_plan_is_one_question() {
        assert_eq!(
            split_verification_questions("  Plan Verification Questions:  "),
            vec!["Plan Verification Questions:"]
        );
    }

    #[test]
    fn test_empty_plan_has_no_questions() {
        assert!(split_verification_questions("").is_empty());
        assert!(split_verification_questions(" \n\n ").is_empty());
    }
}
