//! ReplyGenerator trait definition.
//!
//! This is the abstraction every reply backend implements: the direct
//! generative-language client used inside the gateway, the gateway client
//! used by chat front ends, and test doubles.

use swasthya_types::generation::{GenerationError, ReplyRequest};

/// Trait for reply-generation backends.
///
/// Uses native async fn in traits (RPITIT). Implementations return the
/// reply text only; an empty string is a valid return value here and is
/// rejected one level up as [`GenerationError::EmptyResponse`].
pub trait ReplyGenerator: Send + Sync {
    /// Short backend name for logs (e.g., "gemini", "gateway").
    fn name(&self) -> &str;

    /// Produce the assistant's next reply for `request`.
    fn generate(
        &self,
        request: &ReplyRequest,
    ) -> impl std::future::Future<Output = Result<String, GenerationError>> + Send;
}
