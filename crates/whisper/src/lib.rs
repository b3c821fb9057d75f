//! Whisper domain model.
//!
//! Pure data: no I/O. Shared by the API client, the feed controller and the
//! map engine so that every layer agrees on what a whisper looks like.

mod draft;
mod emotion;
mod timestamp;
mod whisper;

pub use draft::{DraftError, WhisperDraft, MAX_WHISPER_CHARS};
pub use emotion::{Emotion, EmotionMeta, ParseEmotionError};
pub use whisper::{Whisper, WhisperId};
