//! Entity recognition via an LLM call.
//!
//! `LlmEntityRecognizer` asks the model to list the named entities in a text
//! as a JSON array. Only entities whose text occurs verbatim in the input are
//! kept, because the entity memory matches on exact surface text.
//!
//! Failed JSON parsing logs a warning and yields no entities; a failed model
//! call surfaces as [`EntityError::Unavailable`].

use std::sync::Arc;

use serde::Deserialize;

use cove_types::entity::{EntityError, EntityLabel, EntitySpan};
use cove_types::llm::{CompletionRequest, Message};

use crate::llm::box_provider::BoxLlmProvider;

use super::recognizer::EntityRecognizer;

/// System prompt for the entity extraction call.
const ENTITY_SYSTEM_PROMPT: &str = r#"You are a named-entity recognizer. List every named entity (people, places, organizations, and other proper names) that appears in the user's text.

Rules:
1. Copy each entity EXACTLY as it is written in the text, including capitalization
2. List entities in the order they first appear
3. Do NOT include dates, numbers, or common nouns
4. Do NOT explain or add commentary

Return a JSON array. Each element must have exactly these fields:
- "text": string (the entity as written)
- "label": string (one of: "person", "place", "organization", "other")

If there are no entities, return an empty array: []

Example output:
[
  {"text": "Marie Curie", "label": "person"},
  {"text": "Paris", "label": "place"}
]"#;

/// Raw entity as returned by the LLM before validation against the text.
#[derive(Debug, Deserialize)]
struct RawEntity {
    text: String,
    #[serde(default)]
    label: String,
}

/// Recognizer backed by the configured completion provider.
pub struct LlmEntityRecognizer {
    provider: Arc<BoxLlmProvider>,
    model: String,
}

impl LlmEntityRecognizer {
    pub fn new(provider: Arc<BoxLlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }
}

impl EntityRecognizer for LlmEntityRecognizer {
    fn name(&self) -> &str {
        "llm"
    }

    #[tracing::instrument(
        name = "recognize_entities",
        skip(self, text),
        fields(provider = self.provider.name(), text_len = text.len())
    )]
    async fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, EntityError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![Message::user(text)],
            system: Some(ENTITY_SYSTEM_PROMPT.to_string()),
            max_tokens: 512,
            temperature: Some(0.0),
            stop_sequences: None,
        };

        let response = self
            .provider
            .complete(&request)
            .await
            .map_err(|e| EntityError::Unavailable(e.to_string()))?;

        Ok(parse_entities(text, &response.content))
    }
}

/// Parse the model's JSON reply and anchor each entity in `text`.
fn parse_entities(text: &str, reply: &str) -> Vec<EntitySpan> {
    let raw_content = strip_code_fence(reply.trim());

    let raw_entities: Vec<RawEntity> = match serde_json::from_str(raw_content) {
        Ok(entities) => entities,
        Err(e) => {
            tracing::warn!(
                error = %e,
                content_preview = %raw_content.chars().take(200).collect::<String>(),
                "Failed to parse entity JSON; returning no entities"
            );
            return Vec::new();
        }
    };

    raw_entities
        .into_iter()
        .filter(|raw| !raw.text.trim().is_empty())
        .filter_map(|raw| {
            let Some(start) = text.find(raw.text.as_str()) else {
                tracing::debug!(entity = %raw.text, "Entity not present verbatim; skipping");
                return None;
            };
            let label = raw.label.parse().unwrap_or(EntityLabel::Other);
            Some(EntitySpan::new(raw.text, label, start))
        })
        .collect()
}

/// Models often wrap JSON in a Markdown fence; take what is inside.
fn strip_code_fence(content: &str) -> &str {
    content
        .strip_prefix("```json")
        .or_else(|| content.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(content)
}
