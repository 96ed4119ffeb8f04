use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub vetbrain: &'static str,
}

// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let vetbrain = if state.symptoms.is_ready() { "Ready" } else { "Degraded" };
    Json(HealthResponse {
        status: "ok",
        vetbrain,
    })
}
