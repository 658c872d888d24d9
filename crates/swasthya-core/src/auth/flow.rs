//! Client login flow.
//!
//! Ties an [`AuthBackend`] (the gateway's auth endpoints) to a
//! [`SessionStore`]. A successful login persists the session and tells the
//! caller which dashboard the user lands on.

use std::future::Future;

use swasthya_types::auth::{
    AuthError, AuthResponse, Credentials, DemoCredentials, StoredSession, UserProfile, UserType,
};
use swasthya_types::notification::Notification;
use tracing::{info, warn};

use super::store::SessionStore;

/// Remote authentication operations.
pub trait AuthBackend: Send + Sync {
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<AuthResponse, AuthError>> + Send;

    fn demo_login(
        &self,
        user_type: UserType,
    ) -> impl Future<Output = Result<AuthResponse, AuthError>> + Send;

    /// Revoke `access_token` on the server.
    fn logout(&self, access_token: &str) -> impl Future<Output = Result<(), AuthError>> + Send;
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub session: StoredSession,
    /// Dashboard route for the user's type.
    pub dashboard: &'static str,
    pub notification: Notification,
    /// Present for demo logins.
    pub demo_credentials: Option<DemoCredentials>,
}

pub struct LoginFlow<B: AuthBackend, S: SessionStore> {
    backend: B,
    store: S,
}

impl<B: AuthBackend, S: SessionStore> LoginFlow<B, S> {
    pub fn new(backend: B, store: S) -> Self {
        Self { backend, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome, AuthError> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Err(AuthError::Rejected(
                "Email and password are required".to_string(),
            ));
        }
        let response = self.backend.login(credentials).await?;
        self.complete(response, "Login successful! Welcome to your dashboard")
    }

    pub async fn demo_login(&self, user_type: UserType) -> Result<LoginOutcome, AuthError> {
        let response = self.backend.demo_login(user_type).await?;
        self.complete(response, "Demo login successful! Welcome to your dashboard")
    }

    fn complete(
        &self,
        mut response: AuthResponse,
        message: &str,
    ) -> Result<LoginOutcome, AuthError> {
        let demo_credentials = response.demo_credentials.take();
        let session = StoredSession::from(response);
        self.store.save(&session)?;

        info!(
            user_type = %session.user.user_type,
            email = %session.user.email,
            "logged in"
        );

        Ok(LoginOutcome {
            dashboard: session.user.user_type.dashboard_path(),
            notification: Notification::success(message),
            demo_credentials,
            session,
        })
    }

    /// Log out: revoke the token server side, then clear the store.
    ///
    /// Revocation is best-effort; the local session is cleared even when
    /// the server cannot be reached. Returns the user that was logged in.
    pub async fn logout(&self) -> Result<UserProfile, AuthError> {
        let session = self.store.load()?.ok_or(AuthError::NotLoggedIn)?;

        if let Err(e) = self.backend.logout(&session.access_token).await {
            warn!(error = %e, "server-side logout failed, clearing local session anyway");
        }
        self.store.clear()?;

        info!(email = %session.user.email, "logged out");
        Ok(session.user)
    }

    /// The current session, if logged in.
    pub fn current(&self) -> Result<Option<StoredSession>, AuthError> {
        Ok(self.store.load()?)
    }
}

/// Notification shown for a failed login attempt.
pub fn failure_notification(err: &AuthError) -> Notification {
    match err {
        AuthError::InvalidCredentials => Notification::error("Invalid credentials"),
        AuthError::Deserialization(_) | AuthError::Store(_) => {
            Notification::error("Login failed")
        }
        other => Notification::error(other.to_string()),
    }
}
