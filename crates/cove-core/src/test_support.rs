//! Deterministic stand-ins for the model and the entity recognizer.

use std::sync::Mutex;

use cove_types::entity::{EntityError, EntityLabel, EntitySpan};
use cove_types::llm::{CompletionRequest, CompletionResponse, LlmError, StopReason, Usage};

use crate::entity::recognizer::EntityRecognizer;
use crate::llm::provider::LlmProvider;

fn last_user_content(request: &CompletionRequest) -> String {
    request
        .messages
        .last()
        .map(|m| m.content.clone())
        .unwrap_or_default()
}

fn response(content: String) -> CompletionResponse {
    CompletionResponse {
        id: "resp-test".to_string(),
        content,
        model: "test-model".to_string(),
        stop_reason: StopReason::EndTurn,
        usage: Usage::default(),
    }
}

/// Returns `prefix + prompt` and records every prompt it sees.
pub struct EchoProvider {
    prefix: String,
    pub prompts: Mutex<Vec<String>>,
    pub temperatures: Mutex<Vec<Option<f64>>>,
}

impl EchoProvider {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            prompts: Mutex::new(Vec::new()),
            temperatures: Mutex::new(Vec::new()),
        }
    }
}

impl LlmProvider for EchoProvider {
    fn name(&self) -> &str {
        "echo"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let prompt = last_user_content(request);
        self.prompts.lock().unwrap().push(prompt.clone());
        self.temperatures.lock().unwrap().push(request.temperature);
        Ok(response(format!("{}{}", self.prefix, prompt)))
    }
}

/// Replies with canned responses in order and records the prompts.
pub struct ScriptedProvider {
    replies: Mutex<std::collections::VecDeque<String>>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.prompts.lock().unwrap().push(last_user_content(request));
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| LlmError::Provider {
                message: "script exhausted".to_string(),
            })?;
        Ok(response(reply))
    }
}

/// Succeeds for the first `fail_at` calls, then returns an error.
pub struct FailingProvider {
    fail_at: usize,
    calls: Mutex<usize>,
}

impl FailingProvider {
    pub fn after(fail_at: usize) -> Self {
        Self {
            fail_at,
            calls: Mutex::new(0),
        }
    }
}

impl LlmProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let mut calls = self.calls.lock().unwrap();
        *calls += 1;
        if *calls > self.fail_at {
            return Err(LlmError::Overloaded("simulated outage".to_string()));
        }
        Ok(response(format!("ok:{}", last_user_content(request))))
    }
}

/// Recognizes a fixed vocabulary, reporting every occurrence in text order.
pub struct KeywordRecognizer {
    keywords: Vec<String>,
}

impl KeywordRecognizer {
    pub fn new(keywords: &[&str]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl EntityRecognizer for KeywordRecognizer {
    fn name(&self) -> &str {
        "keyword"
    }

    async fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, EntityError> {
        let mut spans: Vec<EntitySpan> = self
            .keywords
            .iter()
            .flat_map(|k| {
                text.match_indices(k.as_str())
                    .map(|(start, m)| EntitySpan::new(m, EntityLabel::Other, start))
                    .collect::<Vec<_>>()
            })
            .collect();
        spans.sort_by_key(|s| s.start);
        Ok(spans)
    }
}

/// A recognizer whose backend is gone.
pub struct UnavailableRecognizer;

impl EntityRecognizer for UnavailableRecognizer {
    fn name(&self) -> &str {
        "unavailable"
    }

    async fn recognize(&self, _text: &str) -> Result<Vec<EntitySpan>, EntityError> {
        Err(EntityError::Unavailable("model not loaded".to_string()))
    }
}
