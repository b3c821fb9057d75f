//! Marker and popup content.

use chrono::{DateTime, Utc};
use hush_geo::{format_relative_time, Coordinate};
use hush_whisper::{Whisper, WhisperId};
use serde::Serialize;

pub const MARKER_SIZE_PX: u32 = 35;
pub const POPUP_EXCERPT_CHARS: usize = 100;
pub const READ_FULL_WHISPER: &str = "Read Full Whisper";
pub const USER_POPUP_TEXT: &str = "📍 You are here";

/// Opaque reference to a marker living on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MarkerHandle(pub u64);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkerIcon {
    /// Round badge in the emotion color with the emoji centered.
    Emotion {
        emoji: &'static str,
        color: &'static str,
        size_px: u32,
    },
    /// The renderer's default pin.
    UserLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSpec {
    pub position: Coordinate,
    pub icon: MarkerIcon,
    pub interactive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopupAction {
    pub label: String,
    pub whisper_id: WhisperId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WhisperPopup {
    pub emoji: &'static str,
    pub label: &'static str,
    pub color: &'static str,
    pub time_ago: String,
    pub excerpt: String,
    pub action: PopupAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Popup {
    Text { text: String },
    Whisper(WhisperPopup),
}

impl Popup {
    pub fn action(&self) -> Option<&PopupAction> {
        match self {
            Popup::Text { .. } => None,
            Popup::Whisper(p) => Some(&p.action),
        }
    }
}

/// Emotion badge at the whisper's position.
pub fn whisper_marker(whisper: &Whisper) -> MarkerSpec {
    let meta = whisper.emotion.meta();
    MarkerSpec {
        position: whisper.position,
        icon: MarkerIcon::Emotion {
            emoji: meta.emoji,
            color: meta.color,
            size_px: MARKER_SIZE_PX,
        },
        interactive: true,
    }
}

/// Popup with the excerpt and a "Read Full Whisper" action.
pub fn whisper_popup(whisper: &Whisper, now: DateTime<Utc>) -> Popup {
    let meta = whisper.emotion.meta();
    Popup::Whisper(WhisperPopup {
        emoji: meta.emoji,
        label: meta.label,
        color: meta.color,
        time_ago: format_relative_time(&whisper.created_at, &now),
        excerpt: whisper.excerpt(POPUP_EXCERPT_CHARS),
        action: PopupAction {
            label: READ_FULL_WHISPER.to_string(),
            whisper_id: whisper.id,
        },
    })
}

/// Non-interactive pin at the user's position.
pub fn user_marker(location: Coordinate) -> MarkerSpec {
    MarkerSpec {
        position: location,
        icon: MarkerIcon::UserLocation,
        interactive: false,
    }
}

pub fn user_popup() -> Popup {
    Popup::Text {
        text: USER_POPUP_TEXT.to_string(),
    }
}
