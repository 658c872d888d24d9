//! Environment-variable secret resolution.
//!
//! The gateway's generation credential only ever comes from the process
//! environment. It is wrapped in a [`SecretString`] on the way in so it
//! cannot end up in `Debug` output or logs.

use secrecy::SecretString;
use swasthya_types::error::ConfigError;

/// Read the secret held in environment variable `var`.
///
/// An unset, empty or non-Unicode variable is reported as
/// [`ConfigError::MissingSecret`].
pub fn resolve_env_secret(var: &str) -> Result<SecretString, ConfigError> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(SecretString::from(value.trim().to_string())),
        Ok(_) | Err(std::env::VarError::NotPresent) | Err(std::env::VarError::NotUnicode(_)) => {
            Err(ConfigError::MissingSecret(var.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn resolves_present_variable() {
        // SAFETY: single-threaded test with a unique variable name.
        unsafe { std::env::set_var("SWASTHYA_TEST_SECRET_1", " key-123 \n") };

        let secret = resolve_env_secret("SWASTHYA_TEST_SECRET_1").unwrap();
        assert_eq!(secret.expose_secret(), "key-123");

        unsafe { std::env::remove_var("SWASTHYA_TEST_SECRET_1") };
    }

    #[test]
    fn missing_variable_is_missing_secret() {
        let err = resolve_env_secret("SWASTHYA_NONEXISTENT_SECRET_XYZ").unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret(ref v) if v == "SWASTHYA_NONEXISTENT_SECRET_XYZ"));
    }

    #[test]
    fn empty_variable_is_missing_secret() {
        // SAFETY: single-threaded test with a unique variable name.
        unsafe { std::env::set_var("SWASTHYA_TEST_SECRET_EMPTY", "   ") };
        assert!(resolve_env_secret("SWASTHYA_TEST_SECRET_EMPTY").is_err());
        unsafe { std::env::remove_var("SWASTHYA_TEST_SECRET_EMPTY") };
    }
}
