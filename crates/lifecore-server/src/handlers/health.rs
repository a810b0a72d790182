//! Health check

use crate::AppState;
use axum::{extract::State, Json};
use lifecore_core::HealthResponse;

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        key_configured: state.relay.is_key_configured(),
    })
}
