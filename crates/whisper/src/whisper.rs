use chrono::{DateTime, Utc};
use hush_geo::Coordinate;
use serde::{Deserialize, Serialize};

use crate::emotion::Emotion;

pub type WhisperId = i64;

/// An anonymous, geotagged, emotion-tagged note.
///
/// Server-created and never mutated client-side; a refetch replaces the
/// whole collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Whisper {
    pub id: WhisperId,
    pub text: String,
    pub emotion: Emotion,
    #[serde(flatten)]
    pub position: Coordinate,
    #[serde(rename = "createdAt", deserialize_with = "crate::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

impl Whisper {
    /// First `max_chars` characters, with "..." appended when cut.
    pub fn excerpt(&self, max_chars: usize) -> String {
        let mut chars = self.text.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }
}
