use hush_whisper::{Emotion, MAX_WHISPER_CHARS};

/// State of the "new whisper" surface.
///
/// The draft text survives a failed submission; it is only discarded when
/// the surface is closed or the whisper is accepted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Compose {
    pub open: bool,
    pub text: String,
    pub emotion: Emotion,
    /// Inline error from the last submission attempt.
    pub error: Option<String>,
    pub submitting: bool,
}

impl Compose {
    /// Characters left before the limit; negative when over.
    pub fn remaining_chars(&self) -> i64 {
        MAX_WHISPER_CHARS as i64 - self.text.chars().count() as i64
    }

    pub fn can_submit(&self, location_known: bool) -> bool {
        !self.submitting && location_known && !self.text.trim().is_empty()
    }

    pub(crate) fn reset(&mut self) {
        *self = Compose::default();
    }
}
