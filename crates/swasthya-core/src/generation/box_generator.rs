//! BoxReplyGenerator -- object-safe dynamic dispatch wrapper for ReplyGenerator.
//!
//! 1. Define an object-safe `ReplyGeneratorDyn` trait with boxed futures
//! 2. Blanket-impl `ReplyGeneratorDyn` for all `T: ReplyGenerator`
//! 3. `BoxReplyGenerator` wraps `Box<dyn ReplyGeneratorDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use swasthya_types::generation::{GenerationError, ReplyRequest};

use super::provider::ReplyGenerator;

/// Object-safe version of [`ReplyGenerator`] with boxed futures.
pub trait ReplyGeneratorDyn: Send + Sync {
    fn name(&self) -> &str;

    fn generate_boxed<'a>(
        &'a self,
        request: &'a ReplyRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, GenerationError>> + Send + 'a>>;
}

impl<T: ReplyGenerator> ReplyGeneratorDyn for T {
    fn name(&self) -> &str {
        ReplyGenerator::name(self)
    }

    fn generate_boxed<'a>(
        &'a self,
        request: &'a ReplyRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, GenerationError>> + Send + 'a>> {
        Box::pin(self.generate(request))
    }
}

/// Type-erased reply generator for runtime backend selection.
///
/// Since `ReplyGenerator` uses RPITIT it cannot be a trait object directly;
/// `BoxReplyGenerator` exposes the same methods over `dyn ReplyGeneratorDyn`.
pub struct BoxReplyGenerator {
    inner: Box<dyn ReplyGeneratorDyn + Send + Sync>,
}

impl BoxReplyGenerator {
    /// Wrap a concrete `ReplyGenerator` in a type-erased box.
    pub fn new<T: ReplyGenerator + 'static>(generator: T) -> Self {
        Self {
            inner: Box::new(generator),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub async fn generate(&self, request: &ReplyRequest) -> Result<String, GenerationError> {
        self.inner.generate_boxed(request).await
    }
}

impl std::fmt::Debug for BoxReplyGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxReplyGenerator")
            .field("name", &self.name())
            .finish()
    }
}
