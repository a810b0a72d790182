//! In-memory payload store using DashMap

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use lifecore_core::ports::PayloadStore;
use lifecore_core::{RecordKind, Result, StoredPayload};
use std::sync::atomic::{AtomicU64, Ordering};

/// Keeps records keyed by the file name they would have on disk.
/// Nothing survives a restart.
pub struct MemoryStore {
    data: DashMap<String, Vec<u8>>,
    seq: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
            seq: AtomicU64::new(0),
        }
    }

    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.data.get(name).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Contents of every record of `kind`, in no particular order
    pub fn records(&self, kind: RecordKind) -> Vec<Vec<u8>> {
        let prefix = format!("{}-", kind.prefix());
        self.data
            .iter()
            .filter(|entry| entry.key().starts_with(&prefix))
            .map(|entry| entry.value().clone())
            .collect()
    }

    fn insert(&self, kind: RecordKind, at: DateTime<Utc>, contents: Vec<u8>) -> String {
        // Sequence suffix keeps same-millisecond records apart
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let name = format!("{}#{}", kind.file_name(at), seq);
        self.data.insert(name.clone(), contents);
        name
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PayloadStore for MemoryStore {
    async fn store_payload(&self, record: &StoredPayload) -> Result<String> {
        let contents = serde_json::to_vec_pretty(record)?;
        Ok(self.insert(RecordKind::Ciphertext, record.received_at, contents))
    }

    async fn store_plaintext(&self, received_at: DateTime<Utc>, plaintext: &[u8]) -> Result<String> {
        Ok(self.insert(RecordKind::Plaintext, received_at, plaintext.to_vec()))
    }
}
