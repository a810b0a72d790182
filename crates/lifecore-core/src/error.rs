//! Error types for the LifeCore relay

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RelayError>;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Secure random source unavailable")]
    EntropyUnavailable,

    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("Public key is not a canonical X25519 encoding")]
    NonCanonicalKey,

    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("Input too short: expected at least {expected} bytes, got {actual}")]
    InvalidInputLength { expected: usize, actual: usize },

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Server private key not configured")]
    KeyNotConfigured,

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl RelayError {
    /// Whether this error came out of opening a message. All of these are
    /// reported to callers identically.
    pub fn is_decrypt_failure(&self) -> bool {
        matches!(
            self,
            RelayError::InvalidEncoding(_)
                | RelayError::InvalidKeyLength { .. }
                | RelayError::NonCanonicalKey
                | RelayError::MalformedEnvelope(_)
                | RelayError::InvalidInputLength { .. }
                | RelayError::AuthenticationFailed
        )
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(e: serde_json::Error) -> Self {
        RelayError::Serialization(e.to_string())
    }
}
