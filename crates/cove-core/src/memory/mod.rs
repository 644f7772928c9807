//! Conversation memory for the verification chain.
//!
//! `ConversationMemory` is the seam the sequential chain uses to surface prior
//! context before a run and record the exchange afterwards. `EntityMemory`
//! is the implementation: context keyed by named entity.

pub mod entity;

use std::future::Future;

use cove_types::entity::EntityError;

pub use entity::EntityMemory;

/// Memory consulted around each run of a sequential chain.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait ConversationMemory: Send + Sync {
    /// Variable name under which `load`'s result enters the chain's pool.
    fn memory_key(&self) -> &str;

    /// Context relevant to `input`. Must not mutate the memory.
    fn load(&self, input: &str) -> impl Future<Output = Result<String, EntityError>> + Send;

    /// Record one completed exchange.
    fn save(
        &mut self,
        input: &str,
        output: &str,
    ) -> impl Future<Output = Result<(), EntityError>> + Send;

    /// Forget everything.
    fn clear(&mut self);
}
