//! Named-entity recognition for the entity memory.
//!
//! - `EntityRecognizer`: RPITIT trait for recognizer backends
//! - `BoxEntityRecognizer`: object-safe wrapper for runtime selection
//! - `HeuristicRecognizer`: offline capitalisation/acronym rules
//! - `LlmEntityRecognizer`: asks the configured model for entities

pub mod heuristic;
pub mod llm;
pub mod recognizer;

pub use heuristic::HeuristicRecognizer;
pub use llm::LlmEntityRecognizer;
pub use recognizer::{BoxEntityRecognizer, EntityRecognizer};
