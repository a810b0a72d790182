//! Receive handlers

use super::ApiError;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use lifecore_core::OkResponse;
use serde_json::Value;
use tracing::{debug, warn};

/// Bodies over the size limit are refused outright. Anything else that is
/// not JSON is treated as empty, so it fails field validation like any
/// other incomplete request.
fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            warn!("Rejected oversized request body: {}", rejection);
            Err(ApiError::payload_too_large())
        }
        Err(rejection) => {
            debug!("Rejected request body: {}", rejection);
            Ok(Value::Null)
        }
    }
}

/// `POST /receive`: store an opaque payload
pub async fn store(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<OkResponse>, ApiError> {
    let body = json_body(body)?;
    let response = state.relay.receive(body).await?;
    Ok(Json(response))
}

/// `POST /receive_box`: open an encrypted envelope and store the plaintext
pub async fn open_box(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<OkResponse>, ApiError> {
    let body = json_body(body)?;
    let response = state.relay.receive_box(&body).await?;
    Ok(Json(response))
}
