//! Single whisper view model.

use chrono::{DateTime, Utc};
use hush_api::{ApiError, WhisperRepository};
use hush_geo::{describe_distance, format_full_date, format_relative_time, Coordinate};
use hush_whisper::{Whisper, WhisperId};

#[derive(Debug, Clone, PartialEq)]
pub struct WhisperDetail {
    pub whisper: Whisper,
    pub time_ago: String,
    pub full_date: String,
    pub distance: String,
}

impl WhisperDetail {
    pub fn new(whisper: Whisper, user_location: Option<Coordinate>, now: DateTime<Utc>) -> Self {
        Self {
            time_ago: format_relative_time(&whisper.created_at, &now),
            full_date: format_full_date(&whisper.created_at),
            distance: describe_distance(user_location, whisper.position),
            whisper,
        }
    }

    /// Text offered to the platform share sheet.
    pub fn share_text(&self) -> String {
        format!("\"{}\" - A whisper from {}", self.whisper.text, self.distance)
    }
}

/// Settled outcome of [`load_detail`].
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Ready(WhisperDetail),
    NotFound { message: String },
    Failed { message: String, retryable: bool },
}

/// Loads one whisper and derives its display strings.
pub async fn load_detail(
    repo: &dyn WhisperRepository,
    id: WhisperId,
    user_location: Option<Coordinate>,
    now: DateTime<Utc>,
) -> DetailState {
    match repo.fetch_by_id(id).await {
        Ok(whisper) => DetailState::Ready(WhisperDetail::new(whisper, user_location, now)),
        Err(ApiError::NotFound(message)) => {
            tracing::debug!(id, "whisper not found");
            DetailState::NotFound { message }
        }
        Err(e) => {
            tracing::warn!(id, error = %e, "failed to load whisper");
            DetailState::Failed {
                retryable: e.is_retryable(),
                message: e.to_string(),
            }
        }
    }
}
