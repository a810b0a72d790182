//! HTTP message protocol

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Error body for a store-only request without a message
pub const ERR_MISSING_MESSAGE: &str = "missing message";
/// Error body for an encrypted request missing `message` or `sender_pk`
pub const ERR_MISSING_FIELDS: &str = "missing fields";
/// Error body for any decryption failure
pub const ERR_DECRYPT_FAILED: &str = "decrypt_failed";
/// Error body when the relay has no private key loaded
pub const ERR_KEY_NOT_CONFIGURED: &str = "server private key not configured";
/// Error body when a decrypted message could not be persisted
pub const ERR_STORAGE_FAILED: &str = "storage_failed";
/// Error body for a request over the body size limit
pub const ERR_PAYLOAD_TOO_LARGE: &str = "payload too large";

/// Encrypted message as it travels over the wire.
///
/// `message` is base64(nonce ‖ ciphertext) and `sender_pk` is the base64
/// public key the message was sealed with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireEnvelope {
    pub message: String,
    pub sender_pk: String,
}

/// Messenger priorities, 1 highest
pub const PRIORITY_HIGH: u8 = 1;
pub const PRIORITY_MEDIUM: u8 = 2;
pub const PRIORITY_LOW: u8 = 3;

/// Sealed message posted to the store-only endpoint with a priority tag.
/// The relay stores it as-is and does not order by priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrioritizedEnvelope {
    #[serde(flatten)]
    pub envelope: WireEnvelope,
    pub priority: u8,
}

/// Boundary validation failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing message")]
    MissingMessage,

    #[error("missing fields")]
    MissingFields,
}

impl ValidationError {
    /// Error string reported to the caller
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationError::MissingMessage => ERR_MISSING_MESSAGE,
            ValidationError::MissingFields => ERR_MISSING_FIELDS,
        }
    }
}

/// A request body after validation
#[derive(Debug, Clone, PartialEq)]
pub enum RelayRequest {
    /// Opaque payload to store as-is
    Store(Value),
    /// Encrypted envelope to open and store
    Boxed(WireEnvelope),
}

impl RelayRequest {
    /// Validate a store-only body. The `message` field must be present and truthy.
    pub fn store(body: Value) -> Result<Self, ValidationError> {
        match body.get("message") {
            Some(message) if is_truthy(message) => Ok(RelayRequest::Store(body)),
            _ => Err(ValidationError::MissingMessage),
        }
    }

    /// Validate an encrypted body. Both fields must be non-empty strings.
    pub fn boxed(body: &Value) -> Result<Self, ValidationError> {
        let message = non_empty_str(body, "message");
        let sender_pk = non_empty_str(body, "sender_pk");

        match (message, sender_pk) {
            (Some(message), Some(sender_pk)) => Ok(RelayRequest::Boxed(WireEnvelope {
                message: message.to_string(),
                sender_pk: sender_pk.to_string(),
            })),
            _ => Err(ValidationError::MissingFields),
        }
    }
}

fn non_empty_str<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Success response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plaintext: Option<String>,
}

impl OkResponse {
    pub fn new() -> Self {
        Self {
            ok: true,
            plaintext: None,
        }
    }

    pub fn with_plaintext(plaintext: String) -> Self {
        Self {
            ok: true,
            plaintext: Some(plaintext),
        }
    }
}

impl Default for OkResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub key_configured: bool,
}
