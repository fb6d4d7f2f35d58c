//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use tubely_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tubely API",
        version = "0.1.0",
        description = "Thumbnail and video uploads for Tubely videos"
    ),
    paths(
        handlers::thumbnail_upload::upload_thumbnail,
        handlers::video_upload::upload_video,
    ),
    components(schemas(models::VideoResponse, error::ErrorResponse)),
    tags(
        (name = "videos", description = "Video media uploads")
    )
)]
pub struct ApiDoc;
