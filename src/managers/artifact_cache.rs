//! Artifact Cache for generated summaries and quizzes.
//!
//! Implements `ArtifactCacheTrait` over the shared key-value store. Summary and
//! quiz entries for one video live under separate keys and never affect
//! each other.

use crate::database::kv_store::{quiz_key, summary_key, KvStore, QUIZ_PREFIX, SUMMARY_PREFIX};
use crate::types::artifacts::{QuizArtifact, SummaryArtifact};
use crate::types::errors::StorageError;
use crate::types::video::VideoId;

/// Trait defining per-video artifact caching.
pub trait ArtifactCacheTrait {
    fn get_summary(&self, video: &VideoId) -> Result<Option<SummaryArtifact>, StorageError>;
    fn put_summary(&self, video: &VideoId, summary: &SummaryArtifact) -> Result<(), StorageError>;
    fn get_quiz(&self, video: &VideoId) -> Result<Option<QuizArtifact>, StorageError>;
    fn put_quiz(&self, video: &VideoId, quiz: &QuizArtifact) -> Result<(), StorageError>;
    fn cached_videos(&self) -> Result<Vec<VideoId>, StorageError>;
}

/// Artifact cache borrowing the process-wide store.
pub struct ArtifactCache<'a> {
    store: &'a KvStore,
}

impl<'a> ArtifactCache<'a> {
    pub fn new(store: &'a KvStore) -> Self {
        Self { store }
    }
}

impl ArtifactCacheTrait for ArtifactCache<'_> {
    fn get_summary(&self, video: &VideoId) -> Result<Option<SummaryArtifact>, StorageError> {
        self.store.get(&summary_key(video))
    }

    /// Overwrites any cached summary for `video`.
    fn put_summary(&self, video: &VideoId, summary: &SummaryArtifact) -> Result<(), StorageError> {
        self.store.set(&summary_key(video), summary)
    }

    fn get_quiz(&self, video: &VideoId) -> Result<Option<QuizArtifact>, StorageError> {
        self.store.get(&quiz_key(video))
    }

    /// Overwrites any cached quiz for `video`.
    fn put_quiz(&self, video: &VideoId, quiz: &QuizArtifact) -> Result<(), StorageError> {
        self.store.set(&quiz_key(video), quiz)
    }

    /// Videos with at least one cached artifact, sorted and deduplicated.
    fn cached_videos(&self) -> Result<Vec<VideoId>, StorageError> {
        let mut videos: Vec<VideoId> = Vec::new();
        for prefix in [SUMMARY_PREFIX, QUIZ_PREFIX] {
            for key in self.store.keys_with_prefix(prefix)? {
                if let Some(id) = key.strip_prefix(prefix) {
                    videos.push(VideoId::new(id));
                }
            }
        }
        videos.sort();
        videos.dedup();
        Ok(videos)
    }
}
