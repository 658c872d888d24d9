//! GatewayClient -- [`ReplyGenerator`] that forwards to the trusted gateway.
//!
//! Chat front ends use this instead of calling the generative endpoint
//! themselves, so they never hold the upstream credential. The stored
//! access token, when present, is attached as a bearer token.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::{Instrument, info_span, warn};

use swasthya_core::auth::store::SessionStore;
use swasthya_core::generation::provider::ReplyGenerator;
use swasthya_observe::genai_attrs::{OP_GATEWAY_REPLY, PROVIDER_GATEWAY};
use swasthya_types::generation::{GenerationError, ReplyRequest};

pub const REPLY_PATH: &str = "/api/v1/chat/reply";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<EnvelopeError>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ReplyData {
    #[serde(default)]
    reply: Option<String>,
}

/// `GET /health` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayHealth {
    pub status: String,
    #[serde(default)]
    pub version: String,
}

pub struct GatewayClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    sessions: Option<Arc<dyn SessionStore>>,
}

impl GatewayClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            sessions: None,
        })
    }

    /// Attach the stored access token to every request.
    ///
    /// The store is read per request, so a login after construction is
    /// picked up without rebuilding the client.
    pub fn with_session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.sessions = Some(store);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn bearer(&self) -> Option<String> {
        let store = self.sessions.as_ref()?;
        match store.access_token() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "could not read stored session, sending without token");
                None
            }
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> GenerationError {
        if e.is_timeout() {
            GenerationError::Timeout(self.timeout.as_secs())
        } else {
            GenerationError::Transport(e.to_string())
        }
    }

    /// Probe the gateway's health endpoint.
    pub async fn health(&self) -> Result<GatewayHealth, GenerationError> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Status {
                code: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        response
            .json()
            .await
            .map_err(|e| GenerationError::Deserialization(e.to_string()))
    }

    async fn call(&self, request: &ReplyRequest) -> Result<String, GenerationError> {
        let mut builder = self
            .client
            .post(format!("{}{REPLY_PATH}", self.base_url))
            .json(request);
        if let Some(token) = self.bearer() {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(GenerationError::Unauthorized);
        }
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let body = serde_json::from_str::<Envelope<serde_json::Value>>(&raw)
                .ok()
                .and_then(|e| e.errors.into_iter().next())
                .map(|e| format!("{}: {}", e.code, e.message))
                .unwrap_or(raw);
            return Err(GenerationError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let envelope: Envelope<ReplyData> = response
            .json()
            .await
            .map_err(|e| GenerationError::Deserialization(e.to_string()))?;

        match envelope.data.and_then(|d| d.reply) {
            Some(reply) if !reply.trim().is_empty() => Ok(reply),
            _ => Err(GenerationError::EmptyResponse),
        }
    }
}

impl ReplyGenerator for GatewayClient {
    fn name(&self) -> &str {
        PROVIDER_GATEWAY
    }

    async fn generate(&self, request: &ReplyRequest) -> Result<String, GenerationError> {
        let span = info_span!(
            "gen_ai.gateway_reply",
            gen_ai.operation.name = OP_GATEWAY_REPLY,
            gen_ai.provider.name = PROVIDER_GATEWAY,
            swasthya.request.language = %request.language,
        );
        self.call(request).instrument(span).await
    }
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("authenticated", &self.sessions.is_some())
            .finish()
    }
}
