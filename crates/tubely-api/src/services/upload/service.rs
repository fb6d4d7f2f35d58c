//! Upload orchestration
//!
//! Pipeline: parse id → authenticate → authorize → open body → validate type →
//! ingest and store → commit. Ownership is settled before a single byte of the
//! body is read, and the record is written only after the object is stored.

use std::sync::Arc;

use axum::extract::multipart::Field;
use axum::extract::Request;
use axum::http::HeaderMap;
use tubely_core::validation::normalize_media_type;
use tubely_core::{AppError, UploadKind, Video};
use tubely_storage::{generate_storage_key, StorageKey};
use uuid::Uuid;

use super::ingest::{field_reader, multipart_error, open_multipart, IngestBuffer};
use crate::auth::{get_bearer_token, validate_jwt};
use crate::state::AppState;

/// Drives a single upload against the application state.
pub struct UploadService {
    state: Arc<AppState>,
}

impl UploadService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            state: state.clone(),
        }
    }

    /// Run the full upload pipeline and return the updated record.
    pub async fn upload(
        &self,
        kind: UploadKind,
        video_id: &str,
        headers: &HeaderMap,
        request: Request,
    ) -> Result<Video, AppError> {
        // 1. Parse identifier
        let video_id = Uuid::parse_str(video_id)?;

        // 2. Authenticate
        let token = get_bearer_token(headers)?;
        let user_id = validate_jwt(&token, self.state.config.jwt_secret())?;

        // 3. Authorize
        let video = self.authorize(video_id, user_id).await?;

        tracing::info!(
            video_id = %video_id,
            user_id = %user_id,
            kind = %kind,
            "Receiving upload"
        );

        // 4. Bound and parse the body
        let max_bytes = self.state.config.max_upload_bytes(kind);
        let mut multipart = open_multipart(request, max_bytes).await?;

        let field_name = kind.form_field();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(e, max_bytes))?
        {
            if field.name() != Some(field_name) {
                continue;
            }

            // 5. Validate the declared content type
            let content_type = validate_content_type(kind, field.content_type())?;

            // 6. Ingest and store
            let (key, url) = match kind {
                UploadKind::Thumbnail => {
                    self.store_streamed(field, &content_type, max_bytes).await?
                }
                UploadKind::Video => self.store_buffered(field, &content_type, max_bytes).await?,
            };

            // 7. Commit
            return self.commit(video, kind, key, url).await;
        }

        Err(AppError::MalformedRequest(format!(
            "Missing multipart field '{}'",
            field_name
        )))
    }

    async fn authorize(&self, video_id: Uuid, user_id: Uuid) -> Result<Video, AppError> {
        let video = self
            .state
            .videos
            .get_video(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;

        if !video.is_owned_by(user_id) {
            return Err(AppError::Forbidden("Not the owner of the video".to_string()));
        }

        Ok(video)
    }

    /// Stream the field straight into the backend.
    async fn store_streamed(
        &self,
        field: Field<'_>,
        content_type: &str,
        max_bytes: usize,
    ) -> Result<(StorageKey, String), AppError> {
        let key = generate_storage_key(content_type)?;
        let storage = self.state.storage.for_kind(UploadKind::Thumbnail);

        let mut body_failure = None;
        let stored = {
            let mut reader = field_reader(field, max_bytes, &mut body_failure);
            storage.store(&key, content_type, &mut reader).await
        };

        match (stored, body_failure) {
            (Ok(url), _) => Ok((key, url)),
            (Err(_), Some(body_err)) => Err(body_err),
            (Err(err), None) => Err(err.into()),
        }
    }

    /// Spool the field to a temp file, then hand the rewound file to the backend.
    async fn store_buffered(
        &self,
        field: Field<'_>,
        content_type: &str,
        max_bytes: usize,
    ) -> Result<(StorageKey, String), AppError> {
        let temp_dir = self
            .state
            .config
            .upload
            .upload_temp_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        let mut buffer = IngestBuffer::create(&temp_dir, ".mp4")?;

        let mut body_failure = None;
        let filled = {
            let mut reader = field_reader(field, max_bytes, &mut body_failure);
            buffer.fill(&mut reader).await
        };
        let size = filled.map_err(|e| {
            body_failure.unwrap_or_else(|| {
                AppError::StorageUnavailable(format!("Failed to buffer upload: {}", e))
            })
        })?;

        tracing::debug!(
            path = %buffer.path().display(),
            size_bytes = size,
            "Upload buffered to temp file"
        );

        let key = generate_storage_key(content_type)?;
        let storage = self.state.storage.for_kind(UploadKind::Video);
        let url = storage.store(&key, content_type, buffer.reader()).await?;

        Ok((key, url))
    }

    /// Record the stored object's URL on the video.
    ///
    /// If the write fails the object is unreferenced. It is deleted before the
    /// record error is returned; a failed delete is logged and leaves it orphaned.
    async fn commit(
        &self,
        mut video: Video,
        kind: UploadKind,
        key: StorageKey,
        url: String,
    ) -> Result<Video, AppError> {
        video.set_media_url(kind, url);

        if let Err(err) = self.state.videos.update_video(&video).await {
            self.discard_orphan(kind, &key).await;
            return Err(match err {
                AppError::RecordUpdateFailed(_) => err,
                other => AppError::RecordUpdateFailed(other.to_string()),
            });
        }

        tracing::info!(
            video_id = %video.id,
            kind = %kind,
            storage_key = %key,
            "Upload committed"
        );

        Ok(video)
    }

    async fn discard_orphan(&self, kind: UploadKind, key: &StorageKey) {
        let storage = self.state.storage.for_kind(kind);
        if let Err(e) = storage.delete(key).await {
            tracing::warn!(
                error = %e,
                storage_key = %key,
                "Failed to delete orphaned upload after record update error"
            );
        }
    }
}

/// Check the part's declared content type against what `kind` accepts.
///
/// Returns the normalized type. The header is trusted as declared; bytes are not sniffed.
fn validate_content_type(kind: UploadKind, declared: Option<&str>) -> Result<String, AppError> {
    let declared = declared.ok_or_else(|| {
        AppError::UnsupportedMediaType("Missing Content-Type for upload".to_string())
    })?;

    if !kind.accepts(declared) {
        return Err(AppError::UnsupportedMediaType(format!(
            "Invalid file type {} for {} upload",
            declared, kind
        )));
    }

    Ok(normalize_media_type(declared))
}
