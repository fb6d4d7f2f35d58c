use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres};
use tubely_core::{AppError, Video};
use uuid::Uuid;

/// Read and write access to video records.
#[async_trait::async_trait]
pub trait VideoRepository: Send + Sync {
    /// Fetch a video by id. `Ok(None)` when no such record exists.
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    /// Persist every mutable field of `video`.
    async fn update_video(&self, video: &Video) -> Result<(), AppError>;
}

#[derive(Debug, FromRow)]
struct VideoRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    thumbnail_url: Option<String>,
    video_url: Option<String>,
}

impl VideoRow {
    fn to_video(self) -> Video {
        Video {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
            thumbnail_url: self.thumbnail_url,
            video_url: self.video_url,
        }
    }
}

/// Postgres-backed video repository
#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl VideoRepository for PgVideoRepository {
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select", db.record_id = %id))]
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let row: Option<VideoRow> = sqlx::query_as::<Postgres, VideoRow>(
            "SELECT id, user_id, title, description, created_at, updated_at, thumbnail_url, video_url \
             FROM videos WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::RecordLookupFailed(e.to_string()))?;

        Ok(row.map(VideoRow::to_video))
    }

    #[tracing::instrument(skip(self, video), fields(db.table = "videos", db.operation = "update", db.record_id = %video.id))]
    async fn update_video(&self, video: &Video) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE videos SET title = $2, description = $3, updated_at = $4, \
             thumbnail_url = $5, video_url = $6 WHERE id = $1",
        )
        .bind(video.id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(video.updated_at)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::RecordUpdateFailed(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::RecordUpdateFailed(format!(
                "Video {} no longer exists",
                video.id
            )));
        }

        Ok(())
    }
}
