//! EntityRecognizer trait and its type-erased wrapper.
//!
//! Follows the same blanket-impl pattern as `BoxLlmProvider`: an object-safe
//! `EntityRecognizerDyn` with boxed futures, implemented for every
//! `T: EntityRecognizer`, wrapped by `BoxEntityRecognizer`.

use std::future::Future;
use std::pin::Pin;

use cove_types::entity::{EntityError, EntitySpan};

/// Finds named entities in free text.
///
/// Spans are returned in discovery order. Matching downstream is by exact
/// surface text, so implementations must report `text` exactly as it
/// appears in the input.
pub trait EntityRecognizer: Send + Sync {
    /// Short backend name for logs (e.g., "heuristic", "llm").
    fn name(&self) -> &str;

    /// Recognize entities in `text`.
    fn recognize(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Vec<EntitySpan>, EntityError>> + Send;
}

/// Object-safe version of [`EntityRecognizer`] with boxed futures.
pub trait EntityRecognizerDyn: Send + Sync {
    fn name(&self) -> &str;

    fn recognize_boxed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<EntitySpan>, EntityError>> + Send + 'a>>;
}

impl<T: EntityRecognizer> EntityRecognizerDyn for T {
    fn name(&self) -> &str {
        EntityRecognizer::name(self)
    }

    fn recognize_boxed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<EntitySpan>, EntityError>> + Send + 'a>> {
        Box::pin(self.recognize(text))
    }
}

/// Type-erased entity recognizer.
pub struct BoxEntityRecognizer {
    inner: Box<dyn EntityRecognizerDyn + Send + Sync>,
}

impl BoxEntityRecognizer {
    pub fn new<T: EntityRecognizer + 'static>(recognizer: T) -> Self {
        Self {
            inner: Box::new(recognizer),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub async fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, EntityError> {
        self.inner.recognize_boxed(text).await
    }
}
