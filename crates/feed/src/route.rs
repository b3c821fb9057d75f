//! Navigation targets.

use hush_whisper::WhisperId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Feed,
    WhisperDetail(WhisperId),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no route for '{0}'")]
pub struct ParseRouteError(pub String);

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Feed => "/".to_string(),
            Route::WhisperDetail(id) => format!("/whisper/{id}"),
        }
    }

    pub fn parse(path: &str) -> Result<Self, ParseRouteError> {
        let trimmed = path.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Ok(Route::Feed);
        }

        trimmed
            .strip_prefix("/whisper/")
            .and_then(|id| id.parse::<WhisperId>().ok())
            .map(Route::WhisperDetail)
            .ok_or_else(|| ParseRouteError(path.to_string()))
    }
}
