//! Feed orchestration for hush.
//!
//! `FeedController` drives the locator and the repository to keep a current
//! whisper collection; `FilterState` is the one emotion filter every
//! presentation reads through, so the list and the map never disagree about
//! what is shown.

mod compose;
mod controller;
mod detail;
mod error;
mod filter;
mod route;
mod state;

pub use compose::Compose;
pub use controller::{FeedController, LOCATION_UNAVAILABLE};
pub use detail::{load_detail, DetailState, WhisperDetail};
pub use error::{FeedError, Result};
pub use filter::{filter_whispers, EmotionCounts, FilterState};
pub use route::{ParseRouteError, Route};
pub use state::{FeedState, ViewMode};
