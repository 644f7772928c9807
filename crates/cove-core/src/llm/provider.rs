//! LlmProvider trait definition.
//!
//! This is the core abstraction every completion backend implements. Uses
//! RPITIT for `complete`; [`super::box_provider::BoxLlmProvider`] erases the
//! concrete type for runtime provider selection.

use cove_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for LLM provider backends (OpenAI, Anthropic, etc.).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). A provider is
/// an opaque function from prompt to completion text: it may fail or hang,
/// and callers do not retry.
///
/// Implementations live in cove-infra (e.g., `OpenAiCompatibleProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai", "anthropic").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
