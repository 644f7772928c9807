//! Entity memory, prompt chaining and the Chain-of-Verification pipeline.
//!
//! This crate defines the "ports" (`LlmProvider`, `EntityRecognizer`) that the
//! infrastructure layer implements. It depends only on `cove-types` -- never
//! on `cove-infra` or any network/IO crate.

pub mod entity;
pub mod llm;
pub mod memory;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod test_support;
