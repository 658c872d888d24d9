//! POST /api/v1/chat/reply -- one assistant reply for a conversation.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use tracing::info;

use swasthya_core::chat::prompt::sanitize_request;
use swasthya_types::generation::{ReplyRequest, ReplyResponse};

use crate::http::error::AppError;
use crate::http::extractors::auth::ChatAccess;
use crate::http::response::ApiResponse;
use crate::state::AppState;

pub async fn reply(
    State(state): State<AppState>,
    access: ChatAccess,
    body: Result<Json<ReplyRequest>, JsonRejection>,
) -> Result<ApiResponse<ReplyResponse>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let Json(request) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    let request = sanitize_request(request, &state.config.chat)?;
    let language = request.language;

    let reply = state.replies.reply(&request).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    info!(
        request_id = %request_id,
        user_id = access.user_id.as_deref().unwrap_or("anonymous"),
        language = %language,
        context_messages = request.messages.len(),
        elapsed_ms = elapsed,
        "reply generated"
    );

    Ok(ApiResponse::success(
        ReplyResponse { reply, language },
        request_id,
        elapsed,
    ))
}
