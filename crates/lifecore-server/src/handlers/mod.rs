//! HTTP handlers

pub mod health;
pub mod receive;

pub use health::health;

use crate::services::ReceiveError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lifecore_core::{
    ErrorResponse, RelayError, ERR_DECRYPT_FAILED, ERR_KEY_NOT_CONFIGURED, ERR_PAYLOAD_TOO_LARGE,
    ERR_STORAGE_FAILED,
};

/// Error response with a fixed, caller-safe message
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: &'static str,
}

impl ApiError {
    pub fn payload_too_large() -> Self {
        ApiError {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: ERR_PAYLOAD_TOO_LARGE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse::new(self.message))).into_response()
    }
}

impl From<ReceiveError> for ApiError {
    fn from(err: ReceiveError) -> Self {
        match err {
            ReceiveError::Invalid(e) => ApiError {
                status: StatusCode::BAD_REQUEST,
                message: e.as_str(),
            },
            ReceiveError::Relay(RelayError::KeyNotConfigured) => ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: ERR_KEY_NOT_CONFIGURED,
            },
            ReceiveError::Relay(e) if e.is_decrypt_failure() => ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: ERR_DECRYPT_FAILED,
            },
            ReceiveError::Relay(_) => ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: ERR_STORAGE_FAILED,
            },
        }
    }
}
