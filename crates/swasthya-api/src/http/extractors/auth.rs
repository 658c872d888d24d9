//! Bearer-token authentication extractors.
//!
//! Tokens arrive as `Authorization: Bearer <token>` and are resolved against
//! the gateway's [`TokenRegistry`](swasthya_infra::auth::TokenRegistry).
//! [`Authenticated`] guards the `/auth/*` routes and rejects with the flat
//! error body; [`ChatAccess`] guards the chat route and rejects with the
//! envelope, or lets everyone through when `require_auth` is off.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::http::error::{AppError, AuthApiError};
use crate::state::AppState;

/// A request carrying a live access token.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub user_id: String,
    pub token: String,
}

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AuthApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve(parts, state).map_err(|msg| AuthApiError::Unauthorized(msg.to_string()))
    }
}

/// Caller of the chat route. `user_id` is `None` when auth is not required.
#[derive(Debug, Clone)]
pub struct ChatAccess {
    pub user_id: Option<String>,
}

impl FromRequestParts<AppState> for ChatAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !state.config.require_auth {
            return Ok(ChatAccess { user_id: None });
        }
        let caller = resolve(parts, state).map_err(|msg| AppError::Unauthorized(msg.to_string()))?;
        Ok(ChatAccess {
            user_id: Some(caller.user_id),
        })
    }
}

/// The raw bearer credential, not resolved against the access tokens.
///
/// `/auth/refresh` takes the refresh token this way.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl FromRequestParts<AppState> for BearerToken {
    type Rejection = AuthApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        bearer_token(parts)
            .map(BearerToken)
            .map_err(|msg| AuthApiError::Unauthorized(msg.to_string()))
    }
}

fn resolve(parts: &Parts, state: &AppState) -> Result<Authenticated, &'static str> {
    let token = bearer_token(parts)?;
    match state.tokens.resolve(&token) {
        Some(user_id) => Ok(Authenticated { user_id, token }),
        None => Err("Invalid or expired token"),
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
fn bearer_token(parts: &Parts) -> Result<String, &'static str> {
    let header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or("Missing token. Provide it via 'Authorization: Bearer <token>'.")?;
    let value = header
        .to_str()
        .map_err(|_| "Invalid Authorization header encoding")?;
    value
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or("Authorization header must use the Bearer scheme")
}
