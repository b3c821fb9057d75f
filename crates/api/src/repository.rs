use async_trait::async_trait;
use hush_geo::Coordinate;
use hush_whisper::{Emotion, Whisper, WhisperDraft, WhisperId};
use std::sync::Arc;

use crate::error::Result;

/// Read/write access to the whisper data source.
#[async_trait]
pub trait WhisperRepository: Send + Sync {
    /// Whispers near `center`, optionally narrowed server-side by emotion.
    /// An empty response body is an empty feed, not an error.
    async fn fetch_nearby(&self, center: Coordinate, emotion: Option<Emotion>)
        -> Result<Vec<Whisper>>;

    async fn fetch_by_id(&self, id: WhisperId) -> Result<Whisper>;

    /// Submits a draft. The created whisper is only observable via refetch.
    async fn create(&self, draft: &WhisperDraft) -> Result<()>;
}

pub type WhisperRepositoryRef = Arc<dyn WhisperRepository>;
