//! Reply service: one bounded call to a reply generator.
//!
//! Wraps a [`BoxReplyGenerator`] with the request timeout and the
//! empty-reply check, so every caller sees the same failure taxonomy.

use std::time::Duration;

use swasthya_types::generation::{GenerationError, ReplyRequest};
use tracing::debug;

use super::box_generator::BoxReplyGenerator;

pub struct ReplyService {
    generator: BoxReplyGenerator,
    timeout: Duration,
}

impl ReplyService {
    pub fn new(generator: BoxReplyGenerator, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Request a reply, bounded by the configured timeout.
    ///
    /// A whitespace-only reply is reported as
    /// [`GenerationError::EmptyResponse`].
    pub async fn reply(&self, request: &ReplyRequest) -> Result<String, GenerationError> {
        debug!(
            generator = self.generator.name(),
            language = %request.language,
            context_messages = request.messages.len(),
            "requesting reply"
        );

        let text = tokio::time::timeout(self.timeout, self.generator.generate(request))
            .await
            .map_err(|_| GenerationError::Timeout(self.timeout.as_secs()))??;

        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text)
    }
}

impl std::fmt::Debug for ReplyService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplyService")
            .field("generator", &self.generator.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::provider::ReplyGenerator;
    use swasthya_types::chat::MessageRole;
    use swasthya_types::generation::ContextTurn;
    use swasthya_types::language::Language;

    struct Fixed(&'static str);

    impl ReplyGenerator for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn generate(&self, _request: &ReplyRequest) -> Result<String, GenerationError> {
            Ok(self.0.to_string())
        }
    }

    struct Slow;

    impl ReplyGenerator for Slow {
        fn name(&self) -> &str {
            "slow"
        }

        async fn generate(&self, _request: &ReplyRequest) -> Result<String, GenerationError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("too late".to_string())
        }
    }

    fn request() -> ReplyRequest {
        ReplyRequest {
            language: Language::English,
            messages: vec![ContextTurn {
                role: MessageRole::User,
                text: "I have fever".to_string(),
            }],
        }
    }

    #[tokio::test]
    async fn returns_generator_text() {
        let service = ReplyService::new(
            BoxReplyGenerator::new(Fixed("Please rest and drink fluids.")),
            Duration::from_secs(5),
        );
        assert_eq!(
            service.reply(&request()).await.unwrap(),
            "Please rest and drink fluids."
        );
    }

    #[tokio::test]
    async fn blank_reply_is_empty_response() {
        let service = ReplyService::new(BoxReplyGenerator::new(Fixed("  \n")), Duration::from_secs(5));
        assert!(matches!(
            service.reply(&request()).await,
            Err(GenerationError::EmptyResponse)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_generator_times_out() {
        let service = ReplyService::new(BoxReplyGenerator::new(Slow), Duration::from_secs(30));
        assert!(matches!(
            service.reply(&request()).await,
            Err(GenerationError::Timeout(30))
        ));
    }
}
