use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Deserialize, Default)]
pub struct ResetRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Serialize)]
pub struct ResetResponse {
    pub session_id: String,
}

// POST /session/reset
pub async fn reset_session(
    State(state): State<Arc<AppState>>,
    body: Option<Json<ResetRequest>>,
) -> Json<ResetResponse> {
    let prior = body.and_then(|Json(req)| req.session_id);
    let session_id = state.sessions.reset(prior.as_deref());
    tracing::info!(prior = ?prior, session_id = %session_id, "session reset");
    Json(ResetResponse { session_id })
}
