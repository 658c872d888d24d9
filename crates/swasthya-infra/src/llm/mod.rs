//! Upstream generation backends used by the trusted gateway.

pub mod gemini;

use swasthya_core::generation::box_generator::BoxReplyGenerator;
use swasthya_types::config::GeminiConfig;
use swasthya_types::error::ConfigError;

use crate::secret::resolve_env_secret;

use self::gemini::GeminiClient;

/// Build the gateway's upstream generator.
///
/// The API key is read from the environment variable named by
/// `config.api_key_env`.
///
/// # Errors
///
/// [`ConfigError::MissingSecret`] when the variable is unset or empty,
/// [`ConfigError::Invalid`] when the HTTP client cannot be built.
pub fn create_generator(config: &GeminiConfig) -> Result<BoxReplyGenerator, ConfigError> {
    let api_key = resolve_env_secret(&config.api_key_env)?;
    let client =
        GeminiClient::new(config, api_key).map_err(|e| ConfigError::Invalid(e.to_string()))?;
    tracing::info!(model = %client.model(), "Gemini generator configured");
    Ok(BoxReplyGenerator::new(client))
}
