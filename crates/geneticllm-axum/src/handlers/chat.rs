//! Chat completion handler.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, State};
use geneticllm_core::{ChatReply, ChatRequest, Identity};
use tracing::{error, info};

use crate::error::HttpError;
use crate::state::AppState;

/// `POST /api/v1/chat`
///
/// Body rejections are taken as a `Result` so malformed JSON surfaces in
/// the same envelope as out-of-bounds fields.
pub async fn chat(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, HttpError> {
    let Json(request) = payload?;
    request.validate()?;

    info!(
        identity = %identity.redacted(),
        message_chars = request.message.chars().count(),
        conversation_id = request.conversation_id.as_deref().unwrap_or("-"),
        "Chat request"
    );

    let reply = state.inference.chat(&request).await.inspect_err(|e| {
        error!(identity = %identity.redacted(), error = %e, "Inference failed");
    })?;

    Ok(Json(reply))
}
