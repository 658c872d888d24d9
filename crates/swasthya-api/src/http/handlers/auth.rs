//! Login, demo login, token refresh, profile and logout.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde::Deserialize;
use tracing::info;

use swasthya_types::auth::{AuthResponse, DemoLoginRequest, UserProfile};

use crate::http::error::AuthApiError;
use crate::http::extractors::auth::{Authenticated, BearerToken};
use crate::state::AppState;

/// Login body. Fields are optional so a missing one is a 400, not a
/// deserialization rejection.
#[derive(Debug, Default, Deserialize)]
pub struct LoginBody {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct ProfileResponse {
    pub user: UserProfile,
}

#[derive(Debug, serde::Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

#[derive(Debug, serde::Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AuthResponse>, AuthApiError> {
    let body: LoginBody = parse_or_default(&body)?;
    let (Some(email), Some(password)) = (
        body.email.filter(|e| !e.trim().is_empty()),
        body.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AuthApiError::BadRequest(
            "Email and password are required".to_string(),
        ));
    };

    let Some(user) = state.accounts.authenticate(&email, &password).cloned() else {
        info!(email = %email.trim(), "login rejected");
        return Err(AuthApiError::Unauthorized("Invalid credentials".to_string()));
    };

    let tokens = state.tokens.issue(&user.id);
    info!(
        user_type = %user.user_type,
        email = %user.email,
        active_tokens = state.tokens.active_count(),
        "login"
    );

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        user,
        access_token: tokens.access_token,
        refresh_token: Some(tokens.refresh_token),
        demo_credentials: None,
    }))
}

/// POST /api/v1/auth/demo-login
///
/// An empty body logs in as the demo citizen.
pub async fn demo_login(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AuthResponse>, AuthApiError> {
    let request: DemoLoginRequest = parse_or_default(&body)?;

    let Some((user, credentials)) = state.accounts.demo_account(request.user_type) else {
        return Err(AuthApiError::NotFound("Demo user not found".to_string()));
    };
    let user = user.clone();
    let tokens = state.tokens.issue(&user.id);
    info!(user_type = %user.user_type, "demo login");

    Ok(Json(AuthResponse {
        message: "Demo login successful".to_string(),
        user,
        access_token: tokens.access_token,
        refresh_token: Some(tokens.refresh_token),
        demo_credentials: Some(credentials),
    }))
}

/// POST /api/v1/auth/refresh
///
/// The refresh token is the bearer credential. It is not rotated.
pub async fn refresh(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<RefreshResponse>, AuthApiError> {
    let Some(refreshed) = state.tokens.refresh(&token) else {
        return Err(AuthApiError::Unauthorized(
            "Invalid or expired refresh token".to_string(),
        ));
    };
    info!(user_id = %refreshed.user_id, "access token refreshed");
    Ok(Json(RefreshResponse {
        access_token: refreshed.access_token,
    }))
}

/// GET /api/v1/auth/profile
pub async fn profile(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<Json<ProfileResponse>, AuthApiError> {
    let user = state
        .accounts
        .find_by_id(&auth.user_id)
        .cloned()
        .ok_or_else(|| AuthApiError::NotFound("User not found".to_string()))?;
    Ok(Json(ProfileResponse { user }))
}

/// POST /api/v1/auth/logout
pub async fn logout(State(state): State<AppState>, auth: Authenticated) -> Json<MessageResponse> {
    state.tokens.revoke(&auth.token);
    info!(user_id = %auth.user_id, "logout");
    Json(MessageResponse {
        message: "Logout successful".to_string(),
    })
}

fn parse_or_default<T: Default + serde::de::DeserializeOwned>(
    body: &Bytes,
) -> Result<T, AuthApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AuthApiError::BadRequest(format!("Invalid request body: {e}")))
}
