//! Whisper submission payload.

use hush_geo::Coordinate;
use serde::Serialize;

use crate::emotion::Emotion;

/// Upper bound on whisper length, in characters.
pub const MAX_WHISPER_CHARS: usize = 300;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("Please write something...")]
    Empty,
    #[error("Message too long. Maximum {max} characters.")]
    TooLong { max: usize },
}

/// A validated whisper ready to be sent.
///
/// Serializes to the create request body: `{ text, emotion, latitude,
/// longitude }` with the emotion in lowercase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhisperDraft {
    text: String,
    #[serde(serialize_with = "serialize_emotion_value")]
    emotion: Emotion,
    #[serde(flatten)]
    position: Coordinate,
}

impl WhisperDraft {
    /// Trims the text and checks it is non-empty and within the limit.
    pub fn new(text: &str, emotion: Emotion, position: Coordinate) -> Result<Self, DraftError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DraftError::Empty);
        }
        if text.chars().count() > MAX_WHISPER_CHARS {
            return Err(DraftError::TooLong {
                max: MAX_WHISPER_CHARS,
            });
        }
        Ok(Self {
            text: text.to_string(),
            emotion,
            position,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn emotion(&self) -> Emotion {
        self.emotion
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }
}

fn serialize_emotion_value<S>(emotion: &Emotion, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(emotion.value())
}
