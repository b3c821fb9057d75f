//! Emotion tags and their display metadata.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One of the four feelings a whisper can carry.
///
/// Responses use the UPPERCASE form; requests use `value()`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Emotion {
    #[default]
    #[serde(alias = "melancholy")]
    Melancholy,
    #[serde(alias = "joy")]
    Joy,
    #[serde(alias = "anxiety")]
    Anxiety,
    #[serde(alias = "peace")]
    Peace,
}

/// Fixed visual encoding of an emotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmotionMeta {
    pub value: &'static str,
    pub emoji: &'static str,
    pub color: &'static str,
    pub label: &'static str,
}

impl Emotion {
    pub const ALL: [Emotion; 4] = [
        Emotion::Melancholy,
        Emotion::Joy,
        Emotion::Anxiety,
        Emotion::Peace,
    ];

    pub fn meta(&self) -> EmotionMeta {
        match self {
            Emotion::Melancholy => EmotionMeta {
                value: "melancholy",
                emoji: "😔",
                color: "#7c9fff",
                label: "Melancholy",
            },
            Emotion::Joy => EmotionMeta {
                value: "joy",
                emoji: "😊",
                color: "#ffd93d",
                label: "Joy",
            },
            Emotion::Anxiety => EmotionMeta {
                value: "anxiety",
                emoji: "😰",
                color: "#ff6b6b",
                label: "Anxiety",
            },
            Emotion::Peace => EmotionMeta {
                value: "peace",
                emoji: "😌",
                color: "#51cf85",
                label: "Peace",
            },
        }
    }

    /// Lowercase wire value used in requests and query strings.
    pub fn value(&self) -> &'static str {
        self.meta().value
    }

    pub fn emoji(&self) -> &'static str {
        self.meta().emoji
    }

    pub fn color(&self) -> &'static str {
        self.meta().color
    }

    pub fn label(&self) -> &'static str {
        self.meta().label
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown emotion '{0}' (expected melancholy, joy, anxiety or peace)")]
pub struct ParseEmotionError(pub String);

impl FromStr for Emotion {
    type Err = ParseEmotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Emotion::ALL
            .into_iter()
            .find(|e| e.value().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParseEmotionError(s.to_string()))
    }
}
