use thiserror::Error;

/// Errors from the persisted client session store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(String),

    #[error("corrupt session data: {0}")]
    Corrupt(String),
}

/// Errors from configuration and secret resolution.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing secret: environment variable '{0}' is not set")]
    MissingSecret(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Corrupt("expected value at line 1".to_string());
        assert_eq!(err.to_string(), "corrupt session data: expected value at line 1");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingSecret("GEMINI_API_KEY".to_string());
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }
}
