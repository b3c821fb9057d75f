//! Map reconciliation for hush.
//!
//! The map surface is a retained-mode object: markers are created once and
//! live until removed. `MapSyncEngine` owns the surface and, on every pass,
//! brings its marker set in line with the filtered whisper collection.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  engine.rs    - MapSyncEngine: lifecycle + marker diff   │
//! │  detail.rs    - single-whisper map                       │
//! │  marker.rs    - marker/popup content (pure)              │
//! └──────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │  surface.rs   - MapBackend / MapSurface capabilities     │
//! │  recording.rs - in-memory surface that logs every call   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! A real renderer implements `MapBackend`; nothing in the engine knows
//! which one it is talking to.

mod config;
mod detail;
mod engine;
mod marker;
mod recording;
mod surface;

pub use config::{MapConfig, DEFAULT_ATTRIBUTION, DEFAULT_DETAIL_ZOOM, DEFAULT_TILE_URL, DEFAULT_ZOOM};
pub use detail::detail_map;
pub use engine::{MapSyncEngine, ReconcileStats};
pub use marker::{
    user_marker, user_popup, whisper_marker, whisper_popup, MarkerHandle, MarkerIcon, MarkerSpec,
    Popup, PopupAction, WhisperPopup, MARKER_SIZE_PX, POPUP_EXCERPT_CHARS, READ_FULL_WHISPER,
    USER_POPUP_TEXT,
};
pub use recording::{LiveMarker, RecordingBackend, RecordingSurface, SurfaceCall};
pub use surface::{ActivationHandler, MapBackend, MapSurface, MapView, TileLayer};
