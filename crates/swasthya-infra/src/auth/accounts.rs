//! AccountDirectory -- the gateway's known login accounts.
//!
//! Built once at startup from `[[accounts]]` in `gateway.toml`. Plaintext
//! passwords from the config are replaced by Argon2id PHC hashes; only demo
//! accounts keep their password, since `/auth/demo-login` echoes it back.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use uuid::Uuid;

use swasthya_types::auth::{DemoCredentials, UserProfile, UserType};
use swasthya_types::config::AccountConfig;
use swasthya_types::error::ConfigError;

struct Account {
    profile: UserProfile,
    password_hash: String,
    demo_password: Option<String>,
}

/// Looks up accounts by email, id or demo user type.
pub struct AccountDirectory {
    accounts: Vec<Account>,
}

impl AccountDirectory {
    /// Hash every configured password and assign each account an id.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] for duplicate emails or a failed hash.
    pub fn from_config(configs: &[AccountConfig]) -> Result<Self, ConfigError> {
        let argon2 = Argon2::default();
        let mut accounts: Vec<Account> = Vec::with_capacity(configs.len());

        for config in configs {
            let email = config.email.trim().to_lowercase();
            if accounts.iter().any(|a| a.profile.email == email) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate account email '{email}'"
                )));
            }

            let salt = SaltString::generate(&mut OsRng);
            let password_hash = argon2
                .hash_password(config.password.as_bytes(), &salt)
                .map_err(|e| ConfigError::Invalid(format!("failed to hash password: {e}")))?
                .to_string();

            accounts.push(Account {
                profile: UserProfile {
                    id: Uuid::now_v7().to_string(),
                    email,
                    user_type: config.user_type,
                    full_name: config.full_name.clone(),
                    phone: config.phone.clone(),
                    abha_id: config.abha_id.clone(),
                    district: config.district.clone(),
                    block: config.block.clone(),
                    village: config.village.clone(),
                },
                password_hash,
                demo_password: config.demo.then(|| config.password.clone()),
            });
        }

        tracing::info!(count = accounts.len(), "account directory loaded");
        Ok(Self { accounts })
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Check an email/password pair. Email matching ignores case.
    pub fn authenticate(&self, email: &str, password: &str) -> Option<&UserProfile> {
        let email = email.trim().to_lowercase();
        let account = self.accounts.iter().find(|a| a.profile.email == email)?;
        let parsed = PasswordHash::new(&account.password_hash).ok()?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .ok()
            .map(|()| &account.profile)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&UserProfile> {
        self.accounts
            .iter()
            .find(|a| a.profile.id == id)
            .map(|a| &a.profile)
    }

    /// The first demo account of `user_type`, with its credentials.
    pub fn demo_account(&self, user_type: UserType) -> Option<(&UserProfile, DemoCredentials)> {
        self.accounts.iter().find_map(|a| {
            let password = a.demo_password.as_ref()?;
            (a.profile.user_type == user_type).then(|| {
                (
                    &a.profile,
                    DemoCredentials {
                        email: a.profile.email.clone(),
                        password: password.clone(),
                    },
                )
            })
        })
    }
}
