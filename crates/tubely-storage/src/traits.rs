//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::keys::StorageKey;
use crate::StorageBackend;
use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncRead;
use tubely_core::AppError;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Object already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::StorageUnavailable(err.to_string())
    }
}

/// Storage abstraction trait
///
/// Both backends honour the same contract for `store`: when it returns `Ok` the
/// object is fully written and reachable at the returned URL, and when it returns
/// `Err` nothing is reachable under the key.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Drain `reader` to EOF into the object named `key` and return its public URL.
    ///
    /// The reader is consumed once; backends never buffer the whole payload in memory.
    async fn store(
        &self,
        key: &StorageKey,
        content_type: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<String>;

    /// Delete an object by its storage key
    async fn delete(&self, key: &StorageKey) -> StorageResult<()>;

    /// Check if an object exists
    async fn exists(&self, key: &StorageKey) -> StorageResult<bool>;

    /// Public URL an object stored under `key` is reachable at.
    fn public_url(&self, key: &StorageKey) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
