//! Storage backend setup

use crate::state::UploadStorage;
use anyhow::{Context, Result};
use tubely_core::{Config, UploadKind};
use tubely_storage::create_storage;

/// Build the storage backend for each upload kind.
pub async fn setup_storage(config: &Config) -> Result<UploadStorage> {
    let thumbnails = create_storage(config, UploadKind::Thumbnail.storage_backend())
        .await
        .context("Failed to initialize thumbnail storage")?;
    let videos = create_storage(config, UploadKind::Video.storage_backend())
        .await
        .context("Failed to initialize video storage")?;

    tracing::info!(
        assets_root = %config.upload.assets_root.display(),
        thumbnail_backend = %thumbnails.backend_type(),
        video_backend = %videos.backend_type(),
        s3_bucket = %config.upload.s3_bucket,
        s3_region = %config.upload.s3_region,
        "Storage initialized"
    );

    Ok(UploadStorage { thumbnails, videos })
}
