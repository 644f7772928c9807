//! Offline entity recognizer based on capitalisation.
//!
//! Treats runs of capitalised words (optionally joined by particles such as
//! "of" or "de") and acronyms as entity candidates. Sentence and question
//! openers ("What", "The", "How", ...) are trimmed from the edges of a run;
//! a run made only of such words is discarded.

use regex::Regex;

use cove_types::entity::{EntityError, EntityLabel, EntitySpan};

use super::recognizer::EntityRecognizer;

/// One capitalised token, allowing inner apostrophes and hyphens
/// ("O'Brien", "Jean-Luc", "Einstein's").
const TOKEN: &str = r"\p{Lu}[\p{L}\p{N}]*(?:['’-][\p{L}\p{N}]+)*";

/// Lowercase particles allowed between capitalised tokens.
const PARTICLES: &str = r"of|the|de|del|la|le|von|van|der|du|da|y";

/// Capitalised words that open sentences or questions rather than name things.
const NON_ENTITY_WORDS: &[&str] = &[
    "A", "An", "The", "This", "That", "These", "Those", "What", "Which", "Who", "Whom", "Whose",
    "When", "Where", "Why", "How", "Is", "Are", "Was", "Were", "Do", "Does", "Did", "Can",
    "Could", "Would", "Should", "Will", "Shall", "May", "Might", "Must", "Has", "Have", "Had",
    "I", "It", "Its", "We", "You", "He", "She", "They", "My", "Our", "Your", "His", "Her",
    "Their", "Here", "There", "Please", "Tell", "Explain", "Describe", "List", "Give", "If",
    "And", "But", "Or", "So", "In", "On", "At", "Of", "For", "From", "To", "By", "With", "As",
    "Also", "Yes", "No", "Not", "Answer", "Question", "Questions", "Initial", "Response",
    "Final", "Verified", "Verification", "Plan", "Relevant", "Context",
];

const HONORIFICS: &[&str] = &[
    "Mr", "Mrs", "Ms", "Dr", "Prof", "Professor", "President", "King", "Queen", "Prince",
    "Princess", "Saint", "St", "Sir", "Lady", "Lord", "General", "Captain", "Senator",
];

const ORGANIZATION_WORDS: &[&str] = &[
    "Inc", "Corp", "Corporation", "Company", "Ltd", "University", "Institute", "Agency",
    "Association", "Foundation", "Bank", "Party", "Council", "Committee", "Museum", "Society",
];

const LOCATION_PREPOSITIONS: &[&str] = &[
    "in", "at", "from", "to", "near", "across", "around", "into", "visit", "visited",
];

/// Capitalisation-driven recognizer. Infallible once constructed.
pub struct HeuristicRecognizer {
    pattern: Regex,
}

impl HeuristicRecognizer {
    /// Compile the recognizer's pattern.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::Unavailable`] if the pattern fails to compile.
    pub fn new() -> Result<Self, EntityError> {
        let pattern = format!(r"\b{TOKEN}(?:(?: (?:{PARTICLES}))* {TOKEN})*");
        let pattern = Regex::new(&pattern).map_err(|e| EntityError::Unavailable(e.to_string()))?;
        Ok(Self { pattern })
    }

    /// Synchronous core of [`EntityRecognizer::recognize`].
    pub fn find(&self, text: &str) -> Vec<EntitySpan> {
        self.pattern
            .find_iter(text)
            .filter_map(|m| trim_run(m.as_str(), m.start()))
            .map(|(start, end)| {
                let surface = &text[start..end];
                EntitySpan::new(surface, infer_label(text, surface, start), start)
            })
            .collect()
    }
}

/// Trim non-entity words and particles from both ends of a run, and a
/// trailing possessive. Returns the absolute byte range that remains.
fn trim_run(run: &str, offset: usize) -> Option<(usize, usize)> {
    // Runs are single-space separated, so token offsets follow from lengths.
    let mut tokens = Vec::new();
    let mut pos = 0;
    for token in run.split(' ') {
        tokens.push((pos, token));
        pos += token.len() + 1;
    }

    let skippable =
        |t: &str| NON_ENTITY_WORDS.contains(&t) || t.starts_with(|c: char| c.is_lowercase());

    let first = tokens.iter().position(|(_, t)| !skippable(*t))?;
    let last = tokens.iter().rposition(|(_, t)| !skippable(*t))?;

    let start = tokens[first].0;
    let (last_pos, last_token) = tokens[last];
    let last_token = last_token
        .strip_suffix("'s")
        .or_else(|| last_token.strip_suffix("’s"))
        .unwrap_or(last_token);
    if last_token.is_empty() {
        return None;
    }
    let end = last_pos + last_token.len();

    Some((offset + start, offset + end))
}

fn infer_label(text: &str, surface: &str, start: usize) -> EntityLabel {
    let words: Vec<&str> = surface.split(' ').collect();
    let first = words.first().copied().unwrap_or_default();

    if HONORIFICS.contains(&first) && words.len() > 1 {
        return EntityLabel::Person;
    }

    let is_acronym = surface.len() >= 2
        && surface.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
    if is_acronym || words.iter().any(|w| ORGANIZATION_WORDS.contains(w)) {
        return EntityLabel::Organization;
    }

    let preceding = text[..start]
        .split_whitespace()
        .next_back()
        .map(|w| w.to_lowercase());
    if preceding.is_some_and(|w| LOCATION_PREPOSITIONS.contains(&w.as_str())) {
        return EntityLabel::Place;
    }

    EntityLabel::Other
}

impl EntityRecognizer for HeuristicRecognizer {
    fn name(&self) -> &str {
        "heuristic"
    }

    async fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, EntityError> {
        Ok(self.find(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(text: &str) -> Vec<String> {
        HeuristicRecognizer::new()
            .unwrap()
            .find(text)
            .into_iter()
            .map(|s| s.text)
            .collect()
    }

    #[test]
    fn test_finds_capitalised_names() {
        assert_eq!(texts("Is Paris bigger than London?"), vec!["Paris", "London"]);
    }

    #[test]
    fn test_strips_question_openers() {
        assert_eq!(texts("What is the capital of France?"), vec!["France"]);
        assert!(texts("What causes tides?").is_empty());
        assert!(texts("How does it work? Why? When?").is_empty());
    }

    #[test]
    fn test_keeps_multiword_names_with_particles() {
        assert_eq!(
            texts("Who founded the University of Oxford?"),
            vec!["University of Oxford"]
        );
        assert_eq!(texts("Tell me about Marie Curie"), vec!["Marie Curie"]);
    }

    #[test]
    fn test_trims_possessive_suffix() {
        assert_eq!(texts("Describe Einstein's theory"), vec!["Einstein"]);
    }

    #[test]
    fn test_reports_every_occurrence_in_order() {
        assert_eq!(
            texts("Paris is in France. Paris is old."),
            vec!["Paris", "France", "Paris"]
        );
    }

    #[test]
    fn test_spans_point_into_the_original_text() {
        let text = "Where is the Eiffel Tower located?";
        let spans = HeuristicRecognizer::new().unwrap().find(text);
        assert_eq!(spans.len(), 1);
        let span = &spans[0];
        assert_eq!(&text[span.start..span.end], "Eiffel Tower");
    }

    #[test]
    fn test_does_not_join_across_lines() {
        assert_eq!(texts("Paris\nLondon"), vec!["Paris", "London"]);
    }

    #[test]
    fn test_labels_people_places_and_organisations() {
        let recognizer = HeuristicRecognizer::new().unwrap();
        let spans = recognizer.find("President Lincoln spoke in Gettysburg before NASA existed");
        let labels: Vec<_> = spans.iter().map(|s| (s.text.as_str(), s.label)).collect();
        assert_eq!(
            labels,
            vec![
                ("President Lincoln", EntityLabel::Person),
                ("Gettysburg", EntityLabel::Place),
                ("NASA", EntityLabel::Organization),
            ]
        );
    }

    #[test]
    fn test_empty_text_has_no_entities() {
        assert!(texts("").is_empty());
        assert!(texts("all lowercase words here").is_empty());
    }

    #[tokio::test]
    async fn test_recognize_matches_find() {
        let recognizer = HeuristicRecognizer::new().unwrap();
        let spans = recognizer.recognize("We flew to Rome").await.unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "Rome");
        assert_eq!(spans[0].label, EntityLabel::Place);
    }

    #[test]
    fn test_handles_non_ascii_names() {
        assert_eq!(texts("Is Zürich in Switzerland?"), vec!["Zürich", "Switzerland"]);
    }
}
