//! Infrastructure layer for Cove.
//!
//! Contains implementations of the traits defined in `cove-core`: concrete
//! LLM providers (OpenAI-compatible endpoints via `async-openai`, Anthropic
//! via `reqwest`), plus the `config.toml` loader, data-directory resolution
//! and API-key lookup from the environment.

pub mod config;
pub mod credential;
pub mod llm;
