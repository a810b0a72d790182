//! Records persisted by the relay

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Store-only payload as written to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPayload {
    pub received_at: DateTime<Utc>,
    pub payload: Value,
}

impl StoredPayload {
    pub fn new(payload: Value) -> Self {
        Self {
            received_at: Utc::now(),
            payload,
        }
    }
}

/// Kind of record, which decides the file prefix and extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Opaque payload from `/receive`
    Ciphertext,
    /// Decrypted plaintext from `/receive_box`
    Plaintext,
}

impl RecordKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            RecordKind::Ciphertext => "ciphertext",
            RecordKind::Plaintext => "pwa",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            RecordKind::Ciphertext => "json",
            RecordKind::Plaintext => "txt",
        }
    }

    /// File name for a record received at `at`, e.g.
    /// `pwa-2024-05-01T10-20-30-123Z.txt`
    pub fn file_name(&self, at: DateTime<Utc>) -> String {
        format!(
            "{}-{}.{}",
            self.prefix(),
            filesystem_timestamp(at),
            self.extension()
        )
    }
}

/// ISO-8601 timestamp with `:` and `.` replaced by `-`
pub fn filesystem_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-")
}
