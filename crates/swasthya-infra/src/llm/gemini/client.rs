//! GeminiClient -- [`ReplyGenerator`] backed by the Generative Language API.
//!
//! Runs only inside the trusted gateway. The API key is sent as the `key`
//! query parameter, is held as a [`SecretString`] and is never logged.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::{Instrument, debug, info_span};

use swasthya_core::chat::prompt::PromptBuilder;
use swasthya_core::generation::provider::ReplyGenerator;
use swasthya_observe::genai_attrs::{OP_GENERATE_CONTENT, PROVIDER_GEMINI};
use swasthya_types::config::GeminiConfig;
use swasthya_types::generation::{GenerationError, ReplyRequest};

use super::types::{ApiErrorBody, GenerateContentRequest, GenerateContentResponse};

/// Direct client for `models/{model}:generateContent`.
///
/// Does not derive `Debug`: it holds the API key.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig, api_key: SecretString) -> Result<Self, GenerationError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    async fn call(&self, request: &ReplyRequest) -> Result<String, GenerationError> {
        let body = GenerateContentRequest::from_prompt(PromptBuilder::build(request));

        let response = self
            .client
            .post(self.url())
            .query(&[("key", self.api_key.expose_secret())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout(self.timeout.as_secs())
                } else {
                    // Strip the URL: it carries the key.
                    GenerationError::Transport(format!("HTTP request failed: {}", e.without_url()))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let body = serde_json::from_str::<ApiErrorBody>(&raw)
                .map(|b| b.error.message)
                .unwrap_or(raw);
            return Err(GenerationError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            GenerationError::Deserialization(format!("failed to parse response: {}", e.without_url()))
        })?;

        debug!(finish_reason = ?parsed.finish_reason(), "generateContent returned");

        match parsed.first_text() {
            Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
            _ => Err(GenerationError::EmptyResponse),
        }
    }
}

impl ReplyGenerator for GeminiClient {
    fn name(&self) -> &str {
        PROVIDER_GEMINI
    }

    async fn generate(&self, request: &ReplyRequest) -> Result<String, GenerationError> {
        let span = info_span!(
            "gen_ai.generate_content",
            gen_ai.operation.name = OP_GENERATE_CONTENT,
            gen_ai.provider.name = PROVIDER_GEMINI,
            gen_ai.request.model = %self.model,
            swasthya.request.language = %request.language,
        );
        self.call(request).instrument(span).await
    }
}
