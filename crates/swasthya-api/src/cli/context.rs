//! Client-side settings shared by the chat and auth commands.

use std::path::PathBuf;
use std::time::Duration;

use swasthya_infra::auth::FileSessionStore;
use swasthya_infra::config::{load_client_config, resolve_data_dir};
use swasthya_types::config::ClientConfig;

#[derive(Debug, Clone)]
pub struct ClientContext {
    pub data_dir: PathBuf,
    pub config: ClientConfig,
}

impl ClientContext {
    /// Read `client.toml`; `gateway` overrides its `gateway_url`.
    pub async fn load(gateway: Option<String>) -> Self {
        let data_dir = resolve_data_dir();
        let mut config = load_client_config(&data_dir).await;
        if let Some(url) = gateway {
            config.gateway_url = url;
        }
        Self { data_dir, config }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config.request_timeout_secs.max(1))
    }

    pub fn session_store(&self) -> FileSessionStore {
        FileSessionStore::new(&self.data_dir)
    }
}
