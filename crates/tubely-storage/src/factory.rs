#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use std::sync::Arc;
use tubely_core::Config;

/// Create the storage backend of the given type from configuration
pub async fn create_storage(
    config: &Config,
    backend: StorageBackend,
) -> StorageResult<Arc<dyn Storage>> {
    match backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            if config.upload.s3_bucket.is_empty() {
                return Err(StorageError::ConfigError(
                    "S3_BUCKET not configured".to_string(),
                ));
            }
            if config.upload.s3_region.is_empty() {
                return Err(StorageError::ConfigError(
                    "S3_REGION or AWS_REGION not configured".to_string(),
                ));
            }

            let storage = S3Storage::new(
                config.upload.s3_bucket.clone(),
                config.upload.s3_region.clone(),
                config.upload.s3_endpoint.clone(),
            )
            .await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let storage =
                LocalStorage::new(config.upload.assets_root.clone(), config.assets_base_url())
                    .await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
