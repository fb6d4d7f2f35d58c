use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::constants::{THUMBNAIL_FIELD, VIDEO_FIELD, VIDEO_MEDIA_TYPE};
use crate::storage_types::StorageBackend;
use crate::validation::normalize_media_type;

/// The two kinds of media a video record can receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadKind {
    Thumbnail,
    Video,
}

impl UploadKind {
    /// Multipart field name carrying the upload.
    pub fn form_field(&self) -> &'static str {
        match self {
            UploadKind::Thumbnail => THUMBNAIL_FIELD,
            UploadKind::Video => VIDEO_FIELD,
        }
    }

    /// Backend holding uploads of this kind: thumbnails stay local, videos go to S3.
    pub fn storage_backend(&self) -> StorageBackend {
        match self {
            UploadKind::Thumbnail => StorageBackend::Local,
            UploadKind::Video => StorageBackend::S3,
        }
    }

    /// Whether the declared content type is acceptable for this kind.
    ///
    /// Thumbnails take any `image/*` type with a non-empty subtype; videos take
    /// exactly `video/mp4`. Parameters and case are ignored.
    pub fn accepts(&self, content_type: &str) -> bool {
        let normalized = normalize_media_type(content_type);
        match self {
            UploadKind::Thumbnail => normalized
                .strip_prefix("image/")
                .is_some_and(|subtype| !subtype.is_empty()),
            UploadKind::Video => normalized == VIDEO_MEDIA_TYPE,
        }
    }
}

impl Display for UploadKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UploadKind::Thumbnail => write!(f, "thumbnail"),
            UploadKind::Video => write!(f, "video"),
        }
    }
}
