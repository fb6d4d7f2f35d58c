/// Issuer stamped into and required from every access token.
pub const TOKEN_ISSUER: &str = "tubely-access";

/// URL path under which the local backend's assets are served.
pub const ASSETS_PATH: &str = "/assets";

/// Multipart field carrying a thumbnail upload.
pub const THUMBNAIL_FIELD: &str = "thumbnail";

/// Multipart field carrying a video upload.
pub const VIDEO_FIELD: &str = "video";

/// The only media type accepted for video uploads.
pub const VIDEO_MEDIA_TYPE: &str = "video/mp4";

pub const BYTES_PER_MB: usize = 1024 * 1024;
