//! TokenRegistry -- opaque bearer tokens issued by the gateway.
//!
//! Tokens are 32 random bytes, hex encoded, prefixed `swt_` (access) or
//! `swr_` (refresh). Only their SHA-256 digests are kept, so a dump of the
//! registry cannot be replayed. Each kind has its own lifetime; expired
//! entries are dropped when looked up and swept whenever a pair is issued.

use std::time::Duration;

use argon2::password_hash::rand_core::{OsRng, RngCore};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use sha2::{Digest, Sha256};

pub const ACCESS_PREFIX: &str = "swt_";
pub const REFRESH_PREFIX: &str = "swr_";

const DEFAULT_ACCESS_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const DEFAULT_REFRESH_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// A freshly issued token pair. Hand it to the client; it is not stored.
#[derive(Clone)]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// A new access token minted from a live refresh token.
#[derive(Clone)]
pub struct RefreshedAccess {
    pub user_id: String,
    pub access_token: String,
}

#[derive(Debug, Clone)]
struct AccessRecord {
    user_id: String,
    /// Digest of the paired refresh token, revoked together with the access token.
    refresh_digest: String,
    issued_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct RefreshRecord {
    user_id: String,
    issued_at: DateTime<Utc>,
}

pub struct TokenRegistry {
    /// access digest -> record
    access: DashMap<String, AccessRecord>,
    /// refresh digest -> record
    refresh: DashMap<String, RefreshRecord>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl Default for TokenRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_ACCESS_TTL, DEFAULT_REFRESH_TTL)
    }
}

impl TokenRegistry {
    pub fn new(access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            access: DashMap::new(),
            refresh: DashMap::new(),
            access_ttl,
            refresh_ttl,
        }
    }

    /// Issue a new access/refresh pair for `user_id`.
    pub fn issue(&self, user_id: &str) -> IssuedTokens {
        let now = Utc::now();
        self.prune(now);

        let refresh_token = format!("{REFRESH_PREFIX}{}", random_hex());
        let refresh_digest = digest(&refresh_token);
        self.refresh.insert(
            refresh_digest.clone(),
            RefreshRecord {
                user_id: user_id.to_string(),
                issued_at: now,
            },
        );
        let access_token = self.insert_access(user_id, refresh_digest, now);

        IssuedTokens {
            access_token,
            refresh_token,
        }
    }

    /// User id owning `access_token`, if the token is live.
    ///
    /// An expired token is removed on the way out.
    pub fn resolve(&self, access_token: &str) -> Option<String> {
        if !access_token.starts_with(ACCESS_PREFIX) {
            return None;
        }
        let key = digest(access_token);
        let now = Utc::now();
        if self
            .access
            .remove_if(&key, |_, record| expired(record.issued_at, self.access_ttl, now))
            .is_some()
        {
            return None;
        }
        self.access.get(&key).map(|record| record.user_id.clone())
    }

    /// Mint a new access token from a live refresh token.
    ///
    /// The refresh token itself is not rotated and keeps its original expiry.
    pub fn refresh(&self, refresh_token: &str) -> Option<RefreshedAccess> {
        if !refresh_token.starts_with(REFRESH_PREFIX) {
            return None;
        }
        let key = digest(refresh_token);
        let now = Utc::now();
        if self
            .refresh
            .remove_if(&key, |_, record| expired(record.issued_at, self.refresh_ttl, now))
            .is_some()
        {
            return None;
        }
        let user_id = self.refresh.get(&key).map(|record| record.user_id.clone())?;
        let access_token = self.insert_access(&user_id, key, now);
        Some(RefreshedAccess {
            user_id,
            access_token,
        })
    }

    /// Revoke `access_token` and its refresh token. Returns whether it was live.
    pub fn revoke(&self, access_token: &str) -> bool {
        match self.access.remove(&digest(access_token)) {
            Some((_, record)) => {
                self.refresh.remove(&record.refresh_digest);
                true
            }
            None => false,
        }
    }

    /// Number of access tokens held, including expired ones not yet swept.
    pub fn active_count(&self) -> usize {
        self.access.len()
    }

    fn insert_access(&self, user_id: &str, refresh_digest: String, now: DateTime<Utc>) -> String {
        let access_token = format!("{ACCESS_PREFIX}{}", random_hex());
        self.access.insert(
            digest(&access_token),
            AccessRecord {
                user_id: user_id.to_string(),
                refresh_digest,
                issued_at: now,
            },
        );
        access_token
    }

    fn prune(&self, now: DateTime<Utc>) {
        self.access
            .retain(|_, record| !expired(record.issued_at, self.access_ttl, now));
        self.refresh
            .retain(|_, record| !expired(record.issued_at, self.refresh_ttl, now));
    }
}

/// A token issued in the future (clock skew) counts as fresh.
fn expired(issued_at: DateTime<Utc>, ttl: Duration, now: DateTime<Utc>) -> bool {
    (now - issued_at).to_std().is_ok_and(|age| age >= ttl)
}

fn digest(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

fn random_hex() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn backdate_access(registry: &TokenRegistry, access_token: &str, by: TimeDelta) {
        registry
            .access
            .get_mut(&digest(access_token))
            .unwrap()
            .issued_at -= by;
    }

    fn backdate_refresh(registry: &TokenRegistry, refresh_token: &str, by: TimeDelta) {
        registry
            .refresh
            .get_mut(&digest(refresh_token))
            .unwrap()
            .issued_at -= by;
    }

    #[test]
    fn issued_tokens_have_prefixes_and_resolve() {
        let registry = TokenRegistry::default();
        let tokens = registry.issue("user-1");

        assert!(tokens.access_token.starts_with("swt_"));
        assert!(tokens.refresh_token.starts_with("swr_"));
        assert_eq!(tokens.access_token.len(), 4 + 64);
        assert_eq!(registry.resolve(&tokens.access_token).as_deref(), Some("user-1"));
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let registry = TokenRegistry::default();
        let tokens = registry.issue("user-1");
        assert!(registry.resolve(&tokens.refresh_token).is_none());
        assert!(registry.resolve("swt_unknown").is_none());
        assert!(registry.refresh(&tokens.access_token).is_none());
    }

    #[test]
    fn tokens_are_unique() {
        let registry = TokenRegistry::default();
        let a = registry.issue("user-1");
        let b = registry.issue("user-1");
        assert_ne!(a.access_token, b.access_token);
        assert_eq!(registry.active_count(), 2);
    }

    #[test]
    fn revoke_removes_pair() {
        let registry = TokenRegistry::default();
        let tokens = registry.issue("user-1");

        assert!(registry.revoke(&tokens.access_token));
        assert!(registry.resolve(&tokens.access_token).is_none());
        assert!(!registry.revoke(&tokens.access_token));
        assert_eq!(registry.active_count(), 0);
        assert!(registry.refresh(&tokens.refresh_token).is_none());
    }

    #[test]
    fn registry_stores_digests_not_tokens() {
        let registry = TokenRegistry::default();
        let tokens = registry.issue("user-1");
        assert!(!registry.access.contains_key(&tokens.access_token));
        assert!(registry.access.contains_key(&digest(&tokens.access_token)));
    }

    #[test]
    fn expired_access_token_is_rejected_and_removed() {
        let registry = TokenRegistry::default();
        let tokens = registry.issue("user-1");

        backdate_access(&registry, &tokens.access_token, TimeDelta::hours(23));
        assert_eq!(registry.resolve(&tokens.access_token).as_deref(), Some("user-1"));

        backdate_access(&registry, &tokens.access_token, TimeDelta::hours(1));
        assert!(registry.resolve(&tokens.access_token).is_none());
        assert_eq!(registry.active_count(), 0);
    }

    #[test]
    fn issuing_sweeps_expired_tokens() {
        let registry = TokenRegistry::default();
        let stale: Vec<_> = (0..500).map(|_| registry.issue("user-1")).collect();
        for tokens in &stale {
            backdate_access(&registry, &tokens.access_token, TimeDelta::days(400));
            backdate_refresh(&registry, &tokens.refresh_token, TimeDelta::days(400));
        }
        assert_eq!(registry.active_count(), 500);

        let fresh = registry.issue("user-2");

        assert_eq!(registry.active_count(), 1);
        assert_eq!(registry.refresh.len(), 1);
        assert!(registry.resolve(&stale[0].access_token).is_none());
        assert_eq!(registry.resolve(&fresh.access_token).as_deref(), Some("user-2"));
    }

    #[test]
    fn configured_ttl_is_honoured() {
        let registry = TokenRegistry::new(Duration::from_secs(60), Duration::from_secs(600));
        let tokens = registry.issue("user-1");

        backdate_access(&registry, &tokens.access_token, TimeDelta::seconds(61));
        assert!(registry.resolve(&tokens.access_token).is_none());
    }

    #[test]
    fn refresh_mints_new_access_token() {
        let registry = TokenRegistry::default();
        let tokens = registry.issue("user-1");
        backdate_access(&registry, &tokens.access_token, TimeDelta::days(2));

        let refreshed = registry.refresh(&tokens.refresh_token).unwrap();

        assert_eq!(refreshed.user_id, "user-1");
        assert_ne!(refreshed.access_token, tokens.access_token);
        assert!(registry.resolve(&tokens.access_token).is_none());
        assert_eq!(registry.resolve(&refreshed.access_token).as_deref(), Some("user-1"));
    }

    #[test]
    fn expired_refresh_token_is_rejected() {
        let registry = TokenRegistry::default();
        let tokens = registry.issue("user-1");
        backdate_refresh(&registry, &tokens.refresh_token, TimeDelta::days(31));

        assert!(registry.refresh(&tokens.refresh_token).is_none());
        assert!(registry.refresh.is_empty());
    }
}
