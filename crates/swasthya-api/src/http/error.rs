//! Error types mapping to HTTP status codes.
//!
//! [`AppError`] renders the envelope format used by the chat API.
//! [`AuthApiError`] renders the flat `{"error": "..."}` body used by the
//! `/auth/*` routes, whose message the client shows verbatim.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use swasthya_types::auth::AuthErrorBody;
use swasthya_types::generation::GenerationError;

use crate::http::response::ApiResponse;

#[derive(Debug)]
pub enum AppError {
    /// Reply generation failed upstream or the request was invalid.
    Generation(GenerationError),
    Unauthorized(String),
    Validation(String),
}

impl From<GenerationError> for AppError {
    fn from(e: GenerationError) -> Self {
        AppError::Generation(e)
    }
}

impl AppError {
    fn parts(&self) -> (&'static str, String) {
        match self {
            AppError::Generation(GenerationError::InvalidRequest(msg)) => {
                ("VALIDATION_ERROR", msg.clone())
            }
            AppError::Generation(GenerationError::Timeout(secs)) => (
                "UPSTREAM_TIMEOUT",
                format!("The health assistant did not respond within {secs}s"),
            ),
            AppError::Generation(GenerationError::Status { code, .. }) => {
                ("UPSTREAM_ERROR", format!("Upstream returned HTTP {code}"))
            }
            AppError::Generation(GenerationError::EmptyResponse) => (
                "UPSTREAM_ERROR",
                "Upstream returned no reply".to_string(),
            ),
            // Upstream transport, decoding and credential failures are the
            // gateway's problem, not the caller's.
            AppError::Generation(_) => (
                "UPSTREAM_ERROR",
                "The health assistant is unavailable".to_string(),
            ),
            AppError::Unauthorized(msg) => ("UNAUTHORIZED", msg.clone()),
            AppError::Validation(msg) => ("VALIDATION_ERROR", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Generation(e) = &self {
            if !matches!(e, GenerationError::InvalidRequest(_)) {
                warn!(error = %e, "reply generation failed");
            }
        }
        let (code, message) = self.parts();
        ApiResponse::error(code, &message, uuid::Uuid::now_v7().to_string(), 0).into_response()
    }
}

/// Failure of an `/auth/*` route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthApiError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AuthApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AuthApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AuthApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };
        (status, Json(AuthErrorBody { error })).into_response()
    }
}
