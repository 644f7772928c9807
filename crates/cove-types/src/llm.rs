//! LLM request/response types for Cove.
//!
//! These types model the data shapes for a single completion call: the
//! request sent for one pipeline stage, the response it produces, usage
//! tracking, and the provider error taxonomy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a message in an LLM conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single message in an LLM conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    /// Convenience constructor for a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Request to an LLM provider for a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier. Empty means "use the provider's configured model".
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
}

/// Response from an LLM provider for a non-streaming completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub content: String,
    pub model: String,
    pub stop_reason: StopReason,
    pub usage: Usage,
}

/// Reason why the LLM stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    StopSequence,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::EndTurn => write!(f, "end_turn"),
            StopReason::MaxTokens => write!(f, "max_tokens"),
            StopReason::StopSequence => write!(f, "stop_sequence"),
        }
    }
}

impl FromStr for StopReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "end_turn" => Ok(StopReason::EndTurn),
            "max_tokens" => Ok(StopReason::MaxTokens),
            "stop_sequence" => Ok(StopReason::StopSequence),
            other => Err(format!("invalid stop reason: '{other}'")),
        }
    }
}

/// Token usage for a completion request/response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Errors from LLM provider operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("provider overloaded: {0}")]
    Overloaded(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("context length exceeded")]
    ContextLengthExceeded,

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Which backend serves completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
    Gemini,
    Mistral,
    #[serde(rename = "openai_compatible")]
    OpenAiCompatible,
    Anthropic,
}

impl ProviderType {
    /// Environment variable conventionally holding this provider's API key.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderType::OpenAi => "OPENAI_API_KEY",
            ProviderType::Gemini => "GEMINI_API_KEY",
            ProviderType::Mistral => "MISTRAL_API_KEY",
            ProviderType::OpenAiCompatible => "COVE_API_KEY",
            ProviderType::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderType::OpenAi => write!(f, "openai"),
            ProviderType::Gemini => write!(f, "gemini"),
            ProviderType::Mistral => write!(f, "mistral"),
            ProviderType::OpenAiCompatible => write!(f, "openai_compatible"),
            ProviderType::Anthropic => write!(f, "anthropic"),
        }
    }
}

impl FromStr for ProviderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(ProviderType::OpenAi),
            "gemini" => Ok(ProviderType::Gemini),
            "mistral" => Ok(ProviderType::Mistral),
            "openai_compatible" => Ok(ProviderType::OpenAiCompatible),
            "anthropic" => Ok(ProviderType::Anthropic),
            other => Err(format!("invalid provider type: '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_roundtrip() {
        for role in [MessageRole::System, MessageRole::User, MessageRole::Assistant] {
            let s = role.to_string();
            let parsed: MessageRole = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_stop_reason_serde() {
        let reason = StopReason::EndTurn;
        let json = serde_json::to_string(&reason).unwrap();
        assert_eq!(json, "\"end_turn\"");
        let parsed: StopReason = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, StopReason::EndTurn);
    }

    #[test]
    fn test_user_message_constructor() {
        let msg = Message::user("What causes tides?");
        assert_eq!(msg.role, MessageRole::User);
        assert_eq!(msg.content, "What causes tides?");
    }

    #[test]
    fn test_request_skips_unset_optionals() {
        let request = CompletionRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![Message::user("hi")],
            system: None,
            max_tokens: 16,
            temperature: None,
            stop_sequences: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("system"));
        assert!(!json.contains("temperature"));
        assert!(!json.contains("stop_sequences"));
    }

    #[test]
    fn test_provider_type_roundtrip() {
        for pt in [
            ProviderType::OpenAi,
            ProviderType::Gemini,
            ProviderType::Mistral,
            ProviderType::OpenAiCompatible,
            ProviderType::Anthropic,
        ] {
            let s = pt.to_string();
            let parsed: ProviderType = s.parse().unwrap();
            assert_eq!(pt, parsed);
        }
    }

    #[test]
    fn test_provider_type_serde_matches_display() {
        for pt in [ProviderType::OpenAi, ProviderType::OpenAiCompatible] {
            let json = serde_json::to_string(&pt).unwrap();
            assert_eq!(json, format!("\"{pt}\""));
        }
    }

    #[test]
    fn test_provider_type_rejects_unknown() {
        let err = "bedrock".parse::<ProviderType>().unwrap_err();
        assert!(err.contains("bedrock"));
    }

    #[test]
    fn test_api_key_env_names() {
        assert_eq!(ProviderType::OpenAi.api_key_env(), "OPENAI_API_KEY");
        assert_eq!(ProviderType::Anthropic.api_key_env(), "ANTHROPIC_API_KEY");
    }
}
