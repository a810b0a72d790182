//! One-file-per-message storage on the local filesystem

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lifecore_core::ports::PayloadStore;
use lifecore_core::{filesystem_timestamp, RecordKind, RelayError, Result, StoredPayload};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::warn;

/// Give up after this many same-millisecond collisions
const MAX_NAME_ATTEMPTS: usize = 1000;

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory recursively
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `contents` to a new file named after `at`. Existing files are
    /// never overwritten: a collision gets a numeric suffix.
    async fn write_new(&self, kind: RecordKind, at: DateTime<Utc>, contents: &[u8]) -> Result<PathBuf> {
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = if attempt == 0 {
                kind.file_name(at)
            } else {
                format!(
                    "{}-{}-{}.{}",
                    kind.prefix(),
                    filesystem_timestamp(at),
                    attempt,
                    kind.extension()
                )
            };
            let path = self.dir.join(name);

            let file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };

            write_or_remove(file, &path, contents).await?;
            return Ok(path);
        }

        Err(RelayError::Storage(format!(
            "No free file name for {} records at {}",
            kind.prefix(),
            filesystem_timestamp(at)
        )))
    }
}

/// Write `contents` to `file`, which was just created at `path`. On failure
/// the partial file is removed.
async fn write_or_remove<W>(mut file: W, path: &Path, contents: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written = match file.write_all(contents).await {
        Ok(()) => file.flush().await,
        Err(e) => Err(e),
    };
    drop(file);

    if let Err(e) = written {
        if let Err(remove_err) = tokio::fs::remove_file(path).await {
            warn!("Failed to remove partial file {}: {}", path.display(), remove_err);
        }
        return Err(e.into());
    }
    Ok(())
}

#[async_trait]
impl PayloadStore for FileStore {
    async fn store_payload(&self, record: &StoredPayload) -> Result<String> {
        let contents = serde_json::to_vec_pretty(record)?;
        let path = self
            .write_new(RecordKind::Ciphertext, record.received_at, &contents)
            .await?;
        Ok(path.display().to_string())
    }

    async fn store_plaintext(&self, received_at: DateTime<Utc>, plaintext: &[u8]) -> Result<String> {
        let path = self
            .write_new(RecordKind::Plaintext, received_at, plaintext)
            .await?;
        Ok(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    /// Writer whose every write fails
    struct FullDisk;

    impl AsyncWrite for FullDisk {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            Poll::Ready(Err(std::io::Error::new(ErrorKind::Other, "no space left")))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_creates_directory_recursively() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("a/b/received");

        let store = FileStore::new(&dir).await.unwrap();
        assert!(dir.is_dir());
        assert_eq!(store.dir(), dir.as_path());
    }

    #[tokio::test]
    async fn test_store_payload_writes_json_record() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path()).await.unwrap();

        let record = StoredPayload::new(json!({ "message": "opaque", "priority": 1 }));
        let location = store.store_payload(&record).await.unwrap();

        let name = Path::new(&location).file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("ciphertext-"));
        assert!(name.ends_with(".json"));
        assert!(!name.contains(':'));

        let written: StoredPayload =
            serde_json::from_slice(&std::fs::read(&location).unwrap()).unwrap();
        assert_eq!(written, record);
    }

    #[tokio::test]
    async fn test_store_plaintext_writes_raw_bytes() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path()).await.unwrap();

        let location = store.store_plaintext(Utc::now(), b"hello").await.unwrap();

        assert!(location.ends_with(".txt"));
        assert_eq!(std::fs::read(&location).unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_same_timestamp_does_not_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path()).await.unwrap();
        let at = Utc::now();

        let first = store.store_plaintext(at, b"one").await.unwrap();
        let second = store.store_plaintext(at, b"two").await.unwrap();

        assert_ne!(first, second);
        assert_eq!(std::fs::read(&first).unwrap(), b"one");
        assert_eq!(std::fs::read(&second).unwrap(), b"two");
        assert!(second.ends_with("-1.txt"));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_partial_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("pwa-partial.txt");
        std::fs::write(&path, b"half").unwrap();

        let result = write_or_remove(FullDisk, &path, b"hello").await;

        assert!(matches!(result, Err(RelayError::Io(_))));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_successful_write_keeps_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("pwa-ok.txt");
        let file = tokio::fs::File::create(&path).await.unwrap();

        write_or_remove(file, &path, b"hello").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"hello");
    }
}
