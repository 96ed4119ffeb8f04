use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::BookingRecord;
use crate::services::conversation;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_data: Option<BookingRecord>,
}

// POST /chat
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(req) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let (session_id, turn) =
        conversation::process_message(&state, req.session_id.as_deref(), &req.message).await;

    Ok(Json(ChatResponse {
        reply: turn.reply,
        session_id,
        booking_data: turn.booking,
    }))
}
