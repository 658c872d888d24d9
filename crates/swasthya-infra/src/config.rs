//! Configuration loading for the gateway and the chat client.
//!
//! Both read TOML from the data directory (`~/.swasthya/` in production):
//! `gateway.toml` for the trusted gateway and `client.toml` for chat front
//! ends. A missing file yields the defaults; a malformed one is logged and
//! also yields the defaults.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use swasthya_types::config::{ClientConfig, GatewayConfig};

pub const DATA_DIR_ENV: &str = "SWASTHYA_DATA_DIR";
pub const GATEWAY_CONFIG_FILE: &str = "gateway.toml";
pub const CLIENT_CONFIG_FILE: &str = "client.toml";

/// Resolve the data directory.
///
/// Priority:
/// 1. `SWASTHYA_DATA_DIR` environment variable
/// 2. `~/.swasthya`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".swasthya");
    }

    PathBuf::from(".swasthya")
}

/// Load `{data_dir}/gateway.toml`.
pub async fn load_gateway_config(data_dir: &Path) -> GatewayConfig {
    load_toml(&data_dir.join(GATEWAY_CONFIG_FILE)).await
}

/// Load `{data_dir}/client.toml`.
pub async fn load_client_config(data_dir: &Path) -> ClientConfig {
    load_toml(&data_dir.join(CLIENT_CONFIG_FILE)).await
}

async fn load_toml<T: DeserializeOwned + Default>(path: &Path) -> T {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            return T::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return T::default();
        }
    };

    match toml::from_str::<T>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            T::default()
        }
    }
}
