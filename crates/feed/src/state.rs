use hush_events::FeedPhase;
use hush_whisper::Whisper;
use serde::{Deserialize, Serialize};

/// What the feed currently has to show.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedState {
    Loading,
    Ready { whispers: Vec<Whisper> },
    Error { reason: String, retryable: bool },
}

impl FeedState {
    /// The unfiltered collection; empty unless `Ready`.
    /// The loaded collection; empty unless `Ready`.
    pub fn whispers(&self) -> &[Whisper] {
        match self {
            FeedState::Ready { whispers } => whispers,
            _ => &[],
        }
    }

    /// Coarse phase as published on the event bus.
    pub fn phase(&self) -> FeedPhase {
        match self {
            FeedState::Loading => FeedPhase::Loading,
            FeedState::Ready { .. } => FeedPhase::Ready,
            FeedState::Error { .. } => FeedPhase::Error,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FeedState::Loading)
    }

    pub fn error_reason(&self) -> Option<&str> {
        match self {
            FeedState::Error { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Which presentation is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    List,
    Map,
}
