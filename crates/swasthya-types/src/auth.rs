//! Authentication payloads and the persisted client session.
//!
//! The wire shapes match the gateway's `/api/v1/auth/*` endpoints:
//! a login returns an access token, a refresh token and the user profile;
//! failures carry a flat `{ "error": "..." }` body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// The two user categories, each with its own dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Asha,
    #[default]
    Citizen,
}

impl UserType {
    /// Route of the dashboard this user type lands on after login.
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            UserType::Asha => "/asha",
            UserType::Citizen => "/citizen",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserType::Asha => write!(f, "asha"),
            UserType::Citizen => write!(f, "citizen"),
        }
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asha" => Ok(UserType::Asha),
            "citizen" => Ok(UserType::Citizen),
            other => Err(format!("invalid user type: '{other}'")),
        }
    }
}

/// Email + password submitted by a login form.
///
/// `Debug` is implemented by hand so the password never reaches logs.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Body of a demo login: just the user category to impersonate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DemoLoginRequest {
    #[serde(default)]
    pub user_type: UserType,
}

/// Profile of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub user_type: UserType,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// National health identifier, citizens only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abha_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub village: Option<String>,
}

/// Credentials echoed back by a demo login so the form can display them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoCredentials {
    pub email: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: String,
    pub user: UserProfile,
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_credentials: Option<DemoCredentials>,
}

/// Failure body returned by the auth endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthErrorBody {
    pub error: String,
}

/// What the client keeps after a successful login.
///
/// Written once at login, read by anything that needs the token or the
/// profile, cleared on logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub user: UserProfile,
    pub stored_at: DateTime<Utc>,
}

impl From<AuthResponse> for StoredSession {
    fn from(response: AuthResponse) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            user: response.user,
            stored_at: Utc::now(),
        }
    }
}

/// Errors from authentication operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The server refused the request; the message is shown verbatim.
    #[error("{0}")]
    Rejected(String),

    #[error("Network error. Please try again.")]
    Network(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("not logged in")]
    NotLoggedIn,

    #[error("session store error: {0}")]
    Store(#[from] crate::error::StoreError),
}
