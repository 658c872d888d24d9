//! Persisted client session port.
//!
//! The session is written once at login, read by anything that needs the
//! access token or the user profile, and cleared on logout. Readers must
//! never assume it is present.

use std::sync::{Mutex, PoisonError};

use swasthya_types::auth::StoredSession;
use swasthya_types::error::StoreError;

/// Where the logged-in session lives between runs.
pub trait SessionStore: Send + Sync {
    /// The stored session, or `None` when logged out.
    fn load(&self) -> Result<Option<StoredSession>, StoreError>;

    /// Replace whatever is stored with `session`.
    fn save(&self, session: &StoredSession) -> Result<(), StoreError>;

    /// Remove the stored session. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), StoreError>;

    /// The stored access token, if any.
    fn access_token(&self) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.map(|s| s.access_token))
    }
}

/// In-process store, used by tests and by sessions that opt out of
/// persistence.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<StoredSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<StoredSession>, StoreError> {
        Ok(self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, session: &StoredSession) -> Result<(), StoreError> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use swasthya_types::auth::{UserProfile, UserType};

    fn session() -> StoredSession {
        StoredSession {
            access_token: "swt_abc".to_string(),
            refresh_token: None,
            user: UserProfile {
                id: "u-1".to_string(),
                email: "asha@demo.com".to_string(),
                user_type: UserType::Asha,
                full_name: "Priya Patel".to_string(),
                phone: None,
                abha_id: None,
                district: None,
                block: None,
                village: None,
            },
            stored_at: Utc::now(),
        }
    }

    #[test]
    fn memory_store_lifecycle() {
        let store = MemorySessionStore::new();
        assert!(store.load().unwrap().is_none());
        assert!(store.access_token().unwrap().is_none());

        store.save(&session()).unwrap();
        assert_eq!(store.access_token().unwrap().as_deref(), Some("swt_abc"));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }
}
