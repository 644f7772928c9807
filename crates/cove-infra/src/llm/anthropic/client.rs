//! AnthropicProvider -- concrete [`LlmProvider`] implementation for Anthropic Claude.
//!
//! Sends requests to the Anthropic Messages API (`/v1/messages`) with
//! the required authentication headers.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use cove_core::llm::provider::LlmProvider;
use cove_types::llm::{CompletionRequest, CompletionResponse, LlmError, StopReason, Usage};

use super::types::{
    AnthropicContentBlock, AnthropicMessage, AnthropicRequest, AnthropicResponse, ErrorPayload,
};

pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

/// Anthropic Claude LLM provider.
///
/// Does NOT derive Debug; the key is only exposed when building headers.
pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl AnthropicProvider {
    /// The Anthropic API version header value.
    const API_VERSION: &'static str = "2023-06-01";

    /// Create a new Anthropic provider.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Provider`] if the HTTP client cannot be built.
    pub fn new(api_key: SecretString, model: impl Into<String>) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: ANTHROPIC_BASE_URL.to_string(),
            model: model.into(),
        })
    }

    /// Override the base URL (proxies, gateways).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Convert a generic [`CompletionRequest`] into an [`AnthropicRequest`].
    fn to_anthropic_request(&self, request: &CompletionRequest) -> AnthropicRequest {
        let messages = request
            .messages
            .iter()
            .map(|m| AnthropicMessage {
                role: m.role.to_string(),
                content: m.content.clone(),
            })
            .collect();

        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        AnthropicRequest {
            model,
            max_tokens: request.max_tokens,
            messages,
            system: request.system.clone(),
            temperature: request.temperature,
            stop_sequences: request.stop_sequences.clone(),
        }
    }
}

impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.to_anthropic_request(request);
        let url = self.url("/v1/messages");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", Self::API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after_ms = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(|secs| secs * 1000);
            let error_body = response.text().await.unwrap_or_default();
            return Err(map_error_status(status.as_u16(), &error_body, retry_after_ms));
        }

        let anthropic_resp: AnthropicResponse = response.json().await.map_err(|e| {
            LlmError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        Ok(into_completion(anthropic_resp))
    }
}

fn into_completion(resp: AnthropicResponse) -> CompletionResponse {
    let content = resp
        .content
        .iter()
        .filter_map(|block| match block {
            AnthropicContentBlock::Text { text } => Some(text.as_str()),
            AnthropicContentBlock::Other => None,
        })
        .collect::<Vec<_>>()
        .join("");

    let stop_reason = match resp.stop_reason.as_deref() {
        Some("max_tokens") => StopReason::MaxTokens,
        Some("stop_sequence") => StopReason::StopSequence,
        _ => StopReason::EndTurn,
    };

    CompletionResponse {
        id: resp.id,
        content,
        model: resp.model,
        stop_reason,
        usage: Usage {
            input_tokens: resp.usage.input_tokens,
            output_tokens: resp.usage.output_tokens,
        },
    }
}

/// Map a non-success HTTP status (and its body) to an [`LlmError`].
fn map_error_status(status: u16, body: &str, retry_after_ms: Option<u64>) -> LlmError {
    let message = serde_json::from_str::<ErrorPayload>(body)
        .map(|p| p.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        401 | 403 => LlmError::AuthenticationFailed,
        429 => LlmError::RateLimited { retry_after_ms },
        503 | 529 => LlmError::Overloaded(message),
        400 if message.contains("prompt is too long") => LlmError::ContextLengthExceeded,
        400 => LlmError::InvalidRequest(message),
        _ => LlmError::Provider {
            message: format!("HTTP {status}: {message}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cove_types::llm::Message;

    fn provider() -> AnthropicProvider {
        AnthropicProvider::new(
            SecretString::from("sk-ant-test".to_string()),
            "claude-sonnet-4-20250514",
        )
        .unwrap()
    }

    #[test]
    fn test_request_conversion() {
        let request = CompletionRequest {
            model: String::new(),
            messages: vec![Message::user("{initial}\n\nPlan Verification Questions:")],
            system: None,
            max_tokens: 512,
            temperature: Some(0.7),
            stop_sequences: Some(vec!["\n\n\n".to_string()]),
        };
        let body = provider().to_anthropic_request(&request);
        assert_eq!(body.model, "claude-sonnet-4-20250514");
        assert_eq!(body.messages[0].role, "user");
        assert_eq!(body.max_tokens, 512);
        assert_eq!(body.temperature, Some(0.7));
        assert_eq!(body.stop_sequences.as_deref(), Some(&["\n\n\n".to_string()][..]));
    }

    #[test]
    fn test_base_url_override() {
        let provider = provider().with_base_url("http://localhost:8080/");
        assert_eq!(provider.url("/v1/messages"), "http://localhost:8080/v1/messages");
    }

    #[test]
    fn test_error_status_mapping() {
        assert!(matches!(
            map_error_status(401, "", None),
            LlmError::AuthenticationFailed
        ));
        assert!(matches!(
            map_error_status(429, "", Some(2000)),
            LlmError::RateLimited {
                retry_after_ms: Some(2000)
            }
        ));
        let overloaded = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;
        assert!(matches!(
            map_error_status(529, overloaded, None),
            LlmError::Overloaded(ref m) if m == "Overloaded"
        ));
        let too_long = r#"{"type":"error","error":{"type":"invalid_request_error","message":"prompt is too long: 300000 tokens"}}"#;
        assert!(matches!(
            map_error_status(400, too_long, None),
            LlmError::ContextLengthExceeded
        ));
        assert!(matches!(
            map_error_status(500, "boom", None),
            LlmError::Provider { ref message } if message == "HTTP 500: boom"
        ));
    }

    #[test]
    fn test_text_blocks_are_concatenated() {
        let resp = AnthropicResponse {
            id: "msg_1".to_string(),
            content: vec![
                AnthropicContentBlock::Text {
                    text: "Tides ".to_string(),
                },
                AnthropicContentBlock::Other,
                AnthropicContentBlock::Text {
                    text: "rise.".to_string(),
                },
            ],
            model: "claude".to_string(),
            stop_reason: Some("max_tokens".to_string()),
            usage: Default::default(),
        };
        let completion = into_completion(resp);
        assert_eq!(completion.content, "Tides rise.");
        assert_eq!(completion.stop_reason, StopReason::MaxTokens);
    }
}
