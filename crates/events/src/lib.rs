//! Shared event contracts.
//!
//! DTOs for events published by the feed controller and the map engine.
//! Keeping them in one crate means producers and consumers agree on field
//! names at compile time.

mod bus;

pub use bus::{EmittedEvent, EventBus, EventBusExt, EventBusRef, InMemoryEventBus, NullEventBus};

use hush_whisper::{Emotion, WhisperId};
use serde::{Deserialize, Serialize};

/// Coarse feed phase, as seen by presentations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedPhase {
    Loading,
    Ready,
    Error,
}

/// Emitted on every feed state transition that is actually applied.
///
/// Producers: feed controller
/// Consumers: list and map presentations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedStateChangedEvent {
    pub phase: FeedPhase,
    /// Fetch generation the transition belongs to.
    pub generation: u64,
    /// Size of the unfiltered collection when `Ready`.
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Emitted when the shared emotion filter changes value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterChangedEvent {
    #[serde(default)]
    pub emotion: Option<Emotion>,
}

/// Emitted after the data source accepted a new whisper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhisperCreatedEvent {
    pub emotion: Emotion,
    pub latitude: f64,
    pub longitude: f64,
}

/// Emitted when a map popup's action is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerActivatedEvent {
    pub whisper_id: WhisperId,
}

/// Event topics.
pub mod event_names {
    pub const FEED_STATE_CHANGED: &str = "feed:state_changed";
    pub const FILTER_CHANGED: &str = "feed:filter_changed";
    pub const WHISPER_CREATED: &str = "feed:whisper_created";
    pub const MARKER_ACTIVATED: &str = "map:marker_activated";
}
