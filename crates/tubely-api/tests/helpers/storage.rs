//! Storage decorator that records how often each backend is called.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncRead, AsyncReadExt};
use tubely_storage::{Storage, StorageBackend, StorageError, StorageKey, StorageResult};

pub struct CountingStorage {
    inner: Arc<dyn Storage>,
    stores: AtomicUsize,
    deletes: AtomicUsize,
    fail_stores: AtomicBool,
    last_key: Mutex<Option<StorageKey>>,
}

impl CountingStorage {
    pub fn new(inner: Arc<dyn Storage>) -> Self {
        Self {
            inner,
            stores: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
            fail_stores: AtomicBool::new(false),
            last_key: Mutex::new(None),
        }
    }

    pub fn store_calls(&self) -> usize {
        self.stores.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    /// Make every subsequent `store` fail part way through the upload.
    pub fn fail_stores(&self, fail: bool) {
        self.fail_stores.store(fail, Ordering::SeqCst);
    }

    /// Key passed to the most recent `store` call.
    pub fn last_key(&self) -> Option<StorageKey> {
        self.last_key.lock().expect("last_key lock").clone()
    }
}

#[async_trait]
impl Storage for CountingStorage {
    async fn store(
        &self,
        key: &StorageKey,
        content_type: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<String> {
        self.stores.fetch_add(1, Ordering::SeqCst);
        *self.last_key.lock().expect("last_key lock") = Some(key.clone());

        if self.fail_stores.load(Ordering::SeqCst) {
            let mut chunk = [0u8; 1024];
            reader.read(&mut chunk).await?;
            return Err(StorageError::BackendError(
                "connection reset by backend".to_string(),
            ));
        }

        self.inner.store(key, content_type, reader).await
    }

    async fn delete(&self, key: &StorageKey) -> StorageResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(key).await
    }

    async fn exists(&self, key: &StorageKey) -> StorageResult<bool> {
        self.inner.exists(key).await
    }

    fn public_url(&self, key: &StorageKey) -> String {
        self.inner.public_url(key)
    }

    fn backend_type(&self) -> StorageBackend {
        self.inner.backend_type()
    }
}
