use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tubely_core::{AppError, Video};
use uuid::Uuid;

use crate::video::VideoRepository;

/// Map-backed video repository.
///
/// Clones share the same map, so a test can keep a handle and inspect records
/// after handing the repository to the application.
#[derive(Clone, Default)]
pub struct InMemoryVideoRepository {
    videos: Arc<Mutex<HashMap<Uuid, Video>>>,
    fail_updates: Arc<AtomicBool>,
    fail_lookups: Arc<AtomicBool>,
    updates: Arc<AtomicUsize>,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, video: Video) {
        if let Ok(mut videos) = self.videos.lock() {
            videos.insert(video.id, video);
        }
    }

    /// Snapshot of a stored record.
    pub fn get(&self, id: Uuid) -> Option<Video> {
        self.videos.lock().ok().and_then(|v| v.get(&id).cloned())
    }

    /// Make every subsequent `update_video` fail.
    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `get_video` fail.
    pub fn fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `update_video` calls.
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(AppError::RecordLookupFailed(
                "record store unavailable".to_string(),
            ));
        }
        let videos = self
            .videos
            .lock()
            .map_err(|e| AppError::RecordLookupFailed(e.to_string()))?;
        Ok(videos.get(&id).cloned())
    }

    async fn update_video(&self, video: &Video) -> Result<(), AppError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::RecordUpdateFailed(
                "record store unavailable".to_string(),
            ));
        }
        let mut videos = self
            .videos
            .lock()
            .map_err(|e| AppError::RecordUpdateFailed(e.to_string()))?;
        match videos.get_mut(&video.id) {
            Some(existing) => {
                *existing = video.clone();
                self.updates.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            None => Err(AppError::RecordUpdateFailed(format!(
                "Video {} no longer exists",
                video.id
            ))),
        }
    }
}
