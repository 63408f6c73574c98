//! Text chat relay handler.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use relaychat_core::models::{ChatReply, ChatRequest};
use tracing::debug;

use crate::AppState;
use crate::error::{AppError, AppResult};

/// `POST /api/chat`: forward the message sequence upstream and return the
/// first choice's content.
///
/// Malformed bodies (not JSON, missing `messages`, unknown roles) and empty
/// sequences are rejected with 400 before anything is sent upstream. Bodies
/// over the configured limit are rejected with 413.
pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatReply>> {
    let Json(request) = payload?;

    if request.messages.is_empty() {
        return Err(AppError::Validation("messages must not be empty".into()));
    }

    debug!(messages = request.messages.len(), "forwarding chat request");
    let reply = state.upstream.complete(&request.messages).await?;

    Ok(Json(ChatReply { reply }))
}
