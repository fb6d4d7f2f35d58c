use crate::keys::StorageKey;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use object_store::aws::AmazonS3Builder;
use object_store::buffered::BufWriter;
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, AttributeValue, Attributes, ObjectStore, ObjectStoreExt, RetryConfig,
};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWriteExt};

/// S3 storage implementation
///
/// Uploads go through a buffered writer: payloads below its buffer size become a
/// single PUT, larger ones a multipart upload. Either way S3 only exposes the
/// object once it is complete, and an aborted upload leaves nothing behind.
#[derive(Clone)]
pub struct S3Storage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        // Credentials come from the usual AWS_* environment variables.
        Self::from_builder(AmazonS3Builder::from_env(), bucket, region, endpoint_url)
    }

    /// Finish configuring `builder` for `bucket` and build the storage.
    ///
    /// Client retries are disabled: a failed request surfaces on the first attempt.
    fn from_builder(
        builder: AmazonS3Builder,
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        let mut builder = builder
            .with_region(region.clone())
            .with_bucket_name(bucket.clone())
            .with_retry(RetryConfig {
                max_retries: 0,
                ..Default::default()
            });

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage {
            store: Arc::new(store),
            bucket,
            region,
            endpoint_url,
        })
    }

    /// Build an S3Storage over an already constructed object store.
    ///
    /// URLs are still generated in the AWS format for `bucket` and `region`.
    pub fn with_store(store: Arc<dyn ObjectStore>, bucket: String, region: String) -> Self {
        S3Storage {
            store,
            bucket,
            region,
            endpoint_url: None,
        }
    }

    /// Generate public URL for S3 object
    ///
    /// For AWS S3, uses the standard format: https://{bucket}.s3.{region}.amazonaws.com/{key}
    /// For S3-compatible providers, uses path-style: {endpoint}/{bucket}/{key}
    fn generate_url(&self, key: &str) -> String {
        if let Some(ref endpoint) = self.endpoint_url {
            let base_url = endpoint.trim_end_matches('/');
            format!("{}/{}/{}", base_url, self.bucket, key)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            )
        }
    }

    async fn put_stream(
        &self,
        location: Path,
        content_type: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<u64> {
        let mut attributes = Attributes::new();
        attributes.insert(
            Attribute::ContentType,
            AttributeValue::from(content_type.to_string()),
        );

        let mut writer =
            BufWriter::new(Arc::clone(&self.store), location).with_attributes(attributes);

        let copied = match tokio::io::copy(reader, &mut writer).await {
            Ok(n) => n,
            Err(e) => {
                if let Err(abort_err) = writer.abort().await {
                    tracing::warn!(error = %abort_err, "Failed to abort S3 upload");
                }
                return Err(StorageError::UploadFailed(format!(
                    "Failed to read upload: {}",
                    e
                )));
            }
        };

        writer
            .shutdown()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        Ok(copied)
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn store(
        &self,
        key: &StorageKey,
        content_type: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<String> {
        let location = Path::from(key.as_str());
        let start = std::time::Instant::now();

        let size = self
            .put_stream(location, content_type, reader)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                e
            })?;

        let url = self.generate_url(key.as_str());

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(url)
    }

    async fn delete(&self, key: &StorageKey) -> StorageResult<()> {
        let start = std::time::Instant::now();
        let location = Path::from(key.as_str());

        self.store.delete(&location).await.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 delete failed"
            );
            StorageError::DeleteFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    async fn exists(&self, key: &StorageKey) -> StorageResult<bool> {
        let location = Path::from(key.as_str());
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    fn public_url(&self, key: &StorageKey) -> String {
        self.generate_url(key.as_str())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
