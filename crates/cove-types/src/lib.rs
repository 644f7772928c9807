//! Shared domain types for Cove.
//!
//! This crate contains the data shapes used across the Chain-of-Verification
//! workspace: LLM requests and responses, entity spans, pipeline turns,
//! configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod entity;
pub mod error;
pub mod llm;
pub mod pipeline;
