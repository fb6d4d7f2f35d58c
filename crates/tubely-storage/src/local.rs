use crate::keys::StorageKey;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncRead;

/// Local filesystem storage implementation
///
/// Objects are written to a hidden staging file next to their final name, synced,
/// and then hard-linked into place. The link fails if the final name exists, so a
/// stored object is never overwritten and a reader never sees a partial file.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for stored assets (e.g., "./assets")
    /// * `base_url` - Base URL the assets are served from (e.g., "http://localhost:8091/assets")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert storage key to filesystem path
    ///
    /// Keys are flat names, so the result is always a direct child of the base path.
    fn key_to_path(&self, key: &StorageKey) -> StorageResult<PathBuf> {
        let name = key.as_str();
        if name.contains("..") || name.contains('/') || name.contains('\\') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }
        Ok(self.base_path.join(name))
    }

    fn staging_path(&self, key: &StorageKey) -> PathBuf {
        self.base_path.join(format!(".{}.part", key.as_str()))
    }

    /// Write `reader` to a fresh staging file and publish it under `path`.
    async fn write_and_publish(
        &self,
        staging: &Path,
        path: &Path,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<u64> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(staging)
            .await
            .map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to create file {}: {}",
                    staging.display(),
                    e
                ))
            })?;

        let written = tokio::io::copy(reader, &mut file).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", staging.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", staging.display(), e))
        })?;
        drop(file);

        fs::hard_link(staging, path).await.map_err(|e| {
            if e.kind() == ErrorKind::AlreadyExists {
                StorageError::AlreadyExists(path.display().to_string())
            } else {
                StorageError::UploadFailed(format!(
                    "Failed to publish file {}: {}",
                    path.display(),
                    e
                ))
            }
        })?;

        Ok(written)
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn store(
        &self,
        key: &StorageKey,
        _content_type: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<String> {
        let path = self.key_to_path(key)?;
        let staging = self.staging_path(key);
        let start = std::time::Instant::now();

        let result = self.write_and_publish(&staging, &path, reader).await;

        // The staging name is never served; it goes whether publishing worked or not.
        if let Err(e) = fs::remove_file(&staging).await {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!(
                    error = %e,
                    path = %staging.display(),
                    "Failed to remove staging file"
                );
            }
        }

        match result {
            Ok(size) => {
                tracing::info!(
                    path = %path.display(),
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Local storage upload successful"
                );
                Ok(self.public_url(key))
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    path = %path.display(),
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Local storage upload failed"
                );
                Err(e)
            }
        }
    }

    async fn delete(&self, key: &StorageKey) -> StorageResult<()> {
        let path = self.key_to_path(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(
                    path = %path.display(),
                    key = %key,
                    "Local storage delete successful"
                );
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to delete file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn exists(&self, key: &StorageKey) -> StorageResult<bool> {
        let path = self.key_to_path(key)?;
        Ok(fs::try_exists(&path).await?)
    }

    fn public_url(&self, key: &StorageKey) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::generate_storage_key;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tempfile::TempDir;
    use tokio::io::ReadBuf;

    const BASE_URL: &str = "http://localhost:8091/assets";

    /// Yields some bytes, then fails like a dropped client connection.
    struct FailingReader {
        sent: bool,
    }

    impl AsyncRead for FailingReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            if self.sent {
                return Poll::Ready(Err(io::Error::new(
                    io::ErrorKind::ConnectionReset,
                    "client went away",
                )));
            }
            self.sent = true;
            buf.put_slice(b"partial");
            Poll::Ready(Ok(()))
        }
    }

    async fn storage() -> (TempDir, LocalStorage) {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path(), BASE_URL.to_string())
            .await
            .unwrap();
        (dir, storage)
    }

    fn entries(dir: &TempDir) -> Vec<String> {
        std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    #[tokio::test]
    async fn store_writes_file_and_returns_url() {
        let (dir, storage) = storage().await;
        let key = generate_storage_key("image/png").unwrap();
        let mut reader: &[u8] = b"\x89PNG fake image";

        let url = storage.store(&key, "image/png", &mut reader).await.unwrap();

        assert_eq!(url, format!("{}/{}", BASE_URL, key));
        let stored = std::fs::read(dir.path().join(key.as_str())).unwrap();
        assert_eq!(stored, b"\x89PNG fake image");
        assert_eq!(entries(&dir), vec![key.to_string()]);
    }

    #[tokio::test]
    async fn store_never_overwrites() {
        let (dir, storage) = storage().await;
        let key = StorageKey::parse("existing.png").unwrap();
        std::fs::write(dir.path().join("existing.png"), b"original").unwrap();

        let mut reader: &[u8] = b"replacement";
        let err = storage
            .store(&key, "image/png", &mut reader)
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::AlreadyExists(_)));
        assert_eq!(
            std::fs::read(dir.path().join("existing.png")).unwrap(),
            b"original"
        );
        assert_eq!(entries(&dir), vec!["existing.png".to_string()]);
    }

    #[tokio::test]
    async fn failed_read_leaves_nothing_behind() {
        let (dir, storage) = storage().await;
        let key = generate_storage_key("image/png").unwrap();
        let mut reader = FailingReader { sent: false };

        let err = storage
            .store(&key, "image/png", &mut reader)
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::UploadFailed(_)));
        assert!(entries(&dir).is_empty());
        assert!(!storage.exists(&key).await.unwrap());
    }

    #[tokio::test]
    async fn delete_removes_file() {
        let (_dir, storage) = storage().await;
        let key = generate_storage_key("image/jpeg").unwrap();
        let mut reader: &[u8] = b"jpeg";
        storage.store(&key, "image/jpeg", &mut reader).await.unwrap();

        storage.delete(&key).await.unwrap();

        assert!(!storage.exists(&key).await.unwrap());
        assert!(matches!(
            storage.delete(&key).await.unwrap_err(),
            StorageError::NotFound(_)
        ));
    }
}
