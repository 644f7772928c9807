//! Entity-keyed conversation memory.
//!
//! Maps the exact surface text of each named entity to the inputs it has
//! appeared in, newline-joined in the order they were seen. Matching is
//! case- and whitespace-sensitive; there is no normalisation and no
//! eviction, so the map grows for the lifetime of the owning pipeline.

use std::collections::{HashMap, HashSet};

use cove_types::entity::{EntityError, EntitySpan};

use crate::entity::BoxEntityRecognizer;

use super::ConversationMemory;

/// Default variable name for the loaded context.
pub const DEFAULT_MEMORY_KEY: &str = "entities";

pub struct EntityMemory {
    recognizer: BoxEntityRecognizer,
    entities: HashMap<String, String>,
    memory_key: String,
}

impl EntityMemory {
    /// Empty memory backed by `recognizer`.
    pub fn new(recognizer: BoxEntityRecognizer) -> Self {
        Self {
            recognizer,
            entities: HashMap::new(),
            memory_key: DEFAULT_MEMORY_KEY.to_string(),
        }
    }

    /// Expose the loaded context under a different variable name.
    pub fn with_memory_key(mut self, memory_key: impl Into<String>) -> Self {
        self.memory_key = memory_key.into();
        self
    }

    /// Name of the recognizer backend.
    pub fn recognizer_name(&self) -> &str {
        self.recognizer.name()
    }

    /// Stored context for one entity.
    pub fn get(&self, entity: &str) -> Option<&str> {
        self.entities.get(entity).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Snapshot of every entity and its context, sorted by entity text.
    pub fn entities(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .entities
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        entries.sort_unstable_by_key(|(k, _)| *k);
        entries
    }

    /// Newline-joined context for every mention of an already-known entity
    /// in `input`, in recognizer discovery order. An entity mentioned twice
    /// contributes its context twice.
    pub async fn load(&self, input: &str) -> Result<String, EntityError> {
        let spans = self.recognizer.recognize(input).await?;

        let matched: Vec<&str> = spans
            .iter()
            .filter_map(|span| self.entities.get(&span.text).map(String::as_str))
            .collect();

        tracing::debug!(
            recognized = spans.len(),
            matched = matched.len(),
            "Loaded entity context"
        );
        Ok(matched.join("\n"))
    }

    /// Append `input` to the context of every entity it mentions.
    ///
    /// Only the input is recorded; `_output` is accepted for the
    /// [`ConversationMemory`] contract but not stored.
    pub async fn save(&mut self, input: &str, _output: &str) -> Result<(), EntityError> {
        let spans = self.recognizer.recognize(input).await?;
        let mentions = distinct_mentions(&spans);

        for entity in &mentions {
            self.entities
                .entry((*entity).to_string())
                .and_modify(|context| {
                    context.push('\n');
                    context.push_str(input);
                })
                .or_insert_with(|| input.to_string());
        }

        tracing::debug!(
            saved = mentions.len(),
            total = self.entities.len(),
            "Saved entity context"
        );
        Ok(())
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

/// Entity texts in discovery order, each at most once.
fn distinct_mentions(spans: &[EntitySpan]) -> Vec<&str> {
    let mut seen = HashSet::new();
    spans
        .iter()
        .map(|span| span.text.as_str())
        .filter(|text| seen.insert(*text))
        .collect()
}

impl ConversationMemory for EntityMemory {
    fn memory_key(&self) -> &str {
        &self.memory_key
    }

    async fn load(&self, input: &str) -> Result<String, EntityError> {
        EntityMemory::load(self, input).await
    }

    async fn save(&mut self, input: &str, output: &str) -> Result<(), EntityError> {
        EntityMemory::save(self, input, output).await
    }

    fn clear(&mut self) {
        EntityMemory::clear(self);
    }
}
