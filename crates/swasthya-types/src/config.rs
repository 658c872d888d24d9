//! Configuration types for the gateway and the chat client.
//!
//! `GatewayConfig` is loaded from `gateway.toml` and `ClientConfig` from
//! `client.toml` in the data directory. All fields have sensible defaults,
//! so an empty or missing file is a valid configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::auth::UserType;
use crate::language::Language;

/// Configuration of the trusted gateway service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Require a bearer token on `/api/v1/chat/reply`.
    #[serde(default = "default_true")]
    pub require_auth: bool,

    #[serde(default)]
    pub gemini: GeminiConfig,

    #[serde(default)]
    pub chat: ChatLimits,

    #[serde(default)]
    pub tokens: TokenLifetimes,

    /// Accounts accepted by the login endpoints.
    #[serde(default = "default_accounts")]
    pub accounts: Vec<AccountConfig>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_true() -> bool {
    true
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            require_auth: true,
            gemini: GeminiConfig::default(),
            chat: ChatLimits::default(),
            tokens: TokenLifetimes::default(),
            accounts: default_accounts(),
        }
    }
}

/// Upstream generative-language endpoint settings.
///
/// The API key itself is never stored here; `api_key_env` names the
/// environment variable it is read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    #[serde(default = "default_gemini_model")]
    pub model: String,

    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash-latest".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_upstream_timeout() -> u64 {
    10
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_gemini_base_url(),
            model: default_gemini_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_upstream_timeout(),
        }
    }
}

/// Limits applied when sanitising an incoming reply request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatLimits {
    /// Longer messages are truncated to this many characters.
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,

    /// Only the most recent messages are forwarded upstream.
    #[serde(default = "default_max_context_messages")]
    pub max_context_messages: usize,
}

fn default_max_message_chars() -> usize {
    2_000
}

fn default_max_context_messages() -> usize {
    20
}

impl Default for ChatLimits {
    fn default() -> Self {
        Self {
            max_message_chars: default_max_message_chars(),
            max_context_messages: default_max_context_messages(),
        }
    }
}

/// How long bearer tokens issued by the gateway stay valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenLifetimes {
    #[serde(default = "default_access_ttl_hours")]
    pub access_ttl_hours: u64,

    #[serde(default = "default_refresh_ttl_days")]
    pub refresh_ttl_days: u64,
}

fn default_access_ttl_hours() -> u64 {
    24
}

fn default_refresh_ttl_days() -> u64 {
    30
}

impl TokenLifetimes {
    pub fn access_ttl(&self) -> Duration {
        Duration::from_secs(self.access_ttl_hours.saturating_mul(60 * 60))
    }

    pub fn refresh_ttl(&self) -> Duration {
        Duration::from_secs(self.refresh_ttl_days.saturating_mul(24 * 60 * 60))
    }
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            access_ttl_hours: default_access_ttl_hours(),
            refresh_ttl_days: default_refresh_ttl_days(),
        }
    }
}

/// A login account known to the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub email: String,
    pub password: String,
    pub user_type: UserType,
    pub full_name: String,
    /// Offered by `/auth/demo-login` for its user type.
    #[serde(default)]
    pub demo: bool,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub abha_id: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub block: Option<String>,
    #[serde(default)]
    pub village: Option<String>,
}

fn default_accounts() -> Vec<AccountConfig> {
    vec![
        AccountConfig {
            email: "asha@demo.com".to_string(),
            password: "demo123".to_string(),
            user_type: UserType::Asha,
            full_name: "Priya Patel".to_string(),
            demo: true,
            phone: Some("+91 9876543210".to_string()),
            abha_id: None,
            district: Some("Koraput".to_string()),
            block: Some("Koraput".to_string()),
            village: Some("Kendrapara".to_string()),
        },
        AccountConfig {
            email: "citizen@demo.com".to_string(),
            password: "demo123".to_string(),
            user_type: UserType::Citizen,
            full_name: "Ramesh Kumar".to_string(),
            demo: true,
            phone: Some("+91 9876543211".to_string()),
            abha_id: Some("12-3456-7890-1234".to_string()),
            district: Some("Koraput".to_string()),
            block: Some("Koraput".to_string()),
            village: Some("Bhadrak".to_string()),
        },
    ]
}

/// Configuration of the chat client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,

    /// Upper bound on one reply request, after which the fallback is shown.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub default_language: Language,
}

fn default_gateway_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            gateway_url: default_gateway_url(),
            request_timeout_secs: default_request_timeout(),
            default_language: Language::default(),
        }
    }
}
