//! Named-entity types shared by recognizers and the entity memory.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse category assigned to a recognized entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityLabel {
    Person,
    Place,
    Organization,
    Other,
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityLabel::Person => write!(f, "person"),
            EntityLabel::Place => write!(f, "place"),
            EntityLabel::Organization => write!(f, "organization"),
            EntityLabel::Other => write!(f, "other"),
        }
    }
}

impl FromStr for EntityLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "person" | "per" => Ok(EntityLabel::Person),
            "place" | "location" | "loc" | "gpe" => Ok(EntityLabel::Place),
            "organization" | "organisation" | "org" => Ok(EntityLabel::Organization),
            "other" | "misc" => Ok(EntityLabel::Other),
            other => Err(format!("invalid entity label: '{other}'")),
        }
    }
}

/// A named span of text found by an entity recognizer.
///
/// `start` and `end` are byte offsets into the recognized text, so
/// `&text[start..end] == span.text` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub text: String,
    pub label: EntityLabel,
    pub start: usize,
    pub end: usize,
}

impl EntitySpan {
    pub fn new(text: impl Into<String>, label: EntityLabel, start: usize) -> Self {
        let text = text.into();
        let end = start + text.len();
        Self {
            text,
            label,
            start,
            end,
        }
    }
}

/// Errors from entity recognition.
#[derive(Debug, thiserror::Error)]
pub enum EntityError {
    #[error("entity recognizer unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_end_is_derived_from_text() {
        let span = EntitySpan::new("Paris", EntityLabel::Place, 10);
        assert_eq!(span.start, 10);
        assert_eq!(span.end, 15);
    }

    #[test]
    fn test_label_accepts_common_aliases() {
        assert_eq!("GPE".parse::<EntityLabel>().unwrap(), EntityLabel::Place);
        assert_eq!("ORG".parse::<EntityLabel>().unwrap(), EntityLabel::Organization);
        assert_eq!("per".parse::<EntityLabel>().unwrap(), EntityLabel::Person);
        assert!("date".parse::<EntityLabel>().is_err());
    }

    #[test]
    fn test_label_serde() {
        let json = serde_json::to_string(&EntityLabel::Organization).unwrap();
        assert_eq!(json, "\"organization\"");
    }
}
