//! Gateway application state.
//!
//! AppState holds everything the HTTP handlers share: the loaded config,
//! the reply service wrapping the upstream generator, the account directory
//! and the token registry. It is cheap to clone.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use swasthya_core::generation::box_generator::BoxReplyGenerator;
use swasthya_core::generation::service::ReplyService;
use swasthya_infra::auth::{AccountDirectory, TokenRegistry};
use swasthya_infra::config::load_gateway_config;
use swasthya_infra::llm::create_generator;
use swasthya_types::config::GatewayConfig;
use swasthya_types::error::ConfigError;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub replies: Arc<ReplyService>,
    pub accounts: Arc<AccountDirectory>,
    pub tokens: Arc<TokenRegistry>,
}

impl AppState {
    /// Wire the state around an already-built generator.
    pub fn new(config: GatewayConfig, generator: BoxReplyGenerator) -> Result<Self, ConfigError> {
        let accounts = AccountDirectory::from_config(&config.accounts)?;
        Ok(Self::from_parts(config, generator, Arc::new(accounts)))
    }

    pub fn from_parts(
        config: GatewayConfig,
        generator: BoxReplyGenerator,
        accounts: Arc<AccountDirectory>,
    ) -> Self {
        let timeout = Duration::from_secs(config.gemini.timeout_secs.max(1));
        let tokens = TokenRegistry::new(config.tokens.access_ttl(), config.tokens.refresh_ttl());
        Self {
            replies: Arc::new(ReplyService::new(generator, timeout)),
            accounts,
            tokens: Arc::new(tokens),
            config: Arc::new(config),
        }
    }

    /// Load `gateway.toml` from `data_dir` and connect the Gemini generator.
    ///
    /// Fails when the API key variable is unset, so a misconfigured gateway
    /// refuses to start rather than answering every request with a fallback.
    pub async fn init(data_dir: &Path) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;

        let config = load_gateway_config(data_dir).await;
        let generator = create_generator(&config.gemini)?;
        Ok(Self::new(config, generator)?)
    }
}
