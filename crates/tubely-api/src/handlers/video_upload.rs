use crate::error::{ErrorResponse, HttpAppError};
use crate::services::upload::UploadService;
use crate::state::AppState;
use axum::{
    extract::{Path, Request, State},
    http::HeaderMap,
    Json,
};
use std::sync::Arc;
use tubely_core::{UploadKind, VideoResponse};

#[utoipa::path(
    post,
    path = "/api/videos/{videoID}/video_upload",
    tag = "videos",
    params(
        ("videoID" = String, Path, description = "Video ID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video uploaded successfully", body = VideoResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the owner of the video", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
    request: Request,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video = UploadService::new(&state)
        .upload(UploadKind::Video, &video_id, &headers, request)
        .await?;

    Ok(Json(VideoResponse::from(video)))
}
