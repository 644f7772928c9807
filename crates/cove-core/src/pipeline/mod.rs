//! Chain-of-Verification pipeline.
//!
//! - `template`: `{name}` prompt templates validated at construction
//! - `prompts`: the stage templates
//! - `questions`: splitting a verification plan into discrete questions
//! - `chain`: `LlmChain`, `FactoredAnswerChain` and `SequentialChain`
//! - `verification`: `ChainOfVerification`, the four-stage pipeline

pub mod chain;
pub mod prompts;
pub mod questions;
pub mod template;
pub mod verification;

use std::collections::HashMap;

pub use chain::{ChainOutput, FactoredAnswerChain, LlmChain, SequentialChain, Step};
pub use template::PromptTemplate;
pub use verification::ChainOfVerification;

/// Variable pool threaded through a chain run.
pub type Variables = HashMap<String, String>;

/// Model and sampling parameters shared by every stage call.
#[derive(Debug, Clone)]
pub struct CompletionSettings {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            model: String::new(),
            temperature: 0.7,
            max_tokens: 1024,
        }
    }
}
