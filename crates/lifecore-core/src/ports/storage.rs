//! Storage trait for received messages

use chrono::{DateTime, Utc};
use lifecore_types::StoredPayload;
use crate::Result;
use async_trait::async_trait;

/// Persists what the relay receives. Implementations return a location
/// string (file path, key) for logging.
#[async_trait]
pub trait PayloadStore: Send + Sync {
    /// Store an opaque store-only payload
    async fn store_payload(&self, record: &StoredPayload) -> Result<String>;

    /// Store a decrypted plaintext
    async fn store_plaintext(&self, received_at: DateTime<Utc>, plaintext: &[u8]) -> Result<String>;
}
