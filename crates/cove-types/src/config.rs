//! Global configuration types for Cove.
//!
//! `GlobalConfig` represents the top-level `config.toml`. Every section and
//! field has a default, so an empty file (or no file) is a valid config.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::llm::ProviderType;
use crate::pipeline::AnswerMode;

/// Top-level configuration, loaded from `~/.cove/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub memory: MemoryConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Which model backs every stage, and how it is sampled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: ProviderType,

    #[serde(default = "default_model")]
    pub model: String,

    /// Override the provider's default endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    1024
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderType::default(),
            model: default_model(),
            base_url: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Backend used to find named entities for the entity memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecognizerKind {
    /// Offline capitalisation/acronym rules.
    #[default]
    Heuristic,
    /// Ask the configured model to list entities.
    Llm,
}

impl fmt::Display for RecognizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecognizerKind::Heuristic => write!(f, "heuristic"),
            RecognizerKind::Llm => write!(f, "llm"),
        }
    }
}

impl FromStr for RecognizerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "heuristic" => Ok(RecognizerKind::Heuristic),
            "llm" => Ok(RecognizerKind::Llm),
            other => Err(format!("invalid recognizer: '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default)]
    pub recognizer: RecognizerKind,

    /// Variable name the memory context is exposed under in the chain.
    #[serde(default = "default_memory_key")]
    pub memory_key: String,
}

fn default_memory_key() -> String {
    "entities".to_string()
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            recognizer: RecognizerKind::default(),
            memory_key: default_memory_key(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub answer_mode: AnswerMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_default_values() {
        let config = GlobalConfig::default();
        assert_eq!(config.llm.provider, ProviderType::OpenAi);
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert!((config.llm.temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.memory.recognizer, RecognizerKind::Heuristic);
        assert_eq!(config.memory.memory_key, "entities");
        assert_eq!(config.pipeline.answer_mode, AnswerMode::Factored);
    }

    #[test]
    fn test_global_config_deserialize_empty() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config.llm.max_tokens, 1024);
        assert!(config.llm.base_url.is_none());
    }

    #[test]
    fn test_global_config_deserialize_with_values() {
        let toml_str = r#"
[llm]
provider = "openai_compatible"
model = "llama3"
base_url = "http://localhost:11434/v1"
temperature = 0.2

[memory]
recognizer = "llm"

[pipeline]
answer_mode = "joint"
"#;
        let config: GlobalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.llm.provider, ProviderType::OpenAiCompatible);
        assert_eq!(config.llm.model, "llama3");
        assert_eq!(config.llm.base_url.as_deref(), Some("http://localhost:11434/v1"));
        assert!((config.llm.temperature - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.llm.max_tokens, 1024);
        assert_eq!(config.memory.recognizer, RecognizerKind::Llm);
        assert_eq!(config.memory.memory_key, "entities");
        assert_eq!(config.pipeline.answer_mode, AnswerMode::Joint);
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let result: Result<GlobalConfig, _> = toml::from_str("[llm]\nprovider = \"bedrock\"\n");
        assert!(result.is_err());
    }
}
