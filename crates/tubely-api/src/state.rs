//! Application state shared by all handlers.

use std::sync::Arc;

use tubely_core::{Config, UploadKind};
use tubely_db::VideoRepository;
use tubely_storage::Storage;

/// The two storage destinations, one per upload kind.
#[derive(Clone)]
pub struct UploadStorage {
    pub thumbnails: Arc<dyn Storage>,
    pub videos: Arc<dyn Storage>,
}

impl UploadStorage {
    pub fn for_kind(&self, kind: UploadKind) -> Arc<dyn Storage> {
        match kind {
            UploadKind::Thumbnail => self.thumbnails.clone(),
            UploadKind::Video => self.videos.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub videos: Arc<dyn VideoRepository>,
    pub storage: UploadStorage,
}

impl AppState {
    pub fn new(config: Config, videos: Arc<dyn VideoRepository>, storage: UploadStorage) -> Self {
        Self {
            config,
            videos,
            storage,
        }
    }
}
