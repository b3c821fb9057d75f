use hush_api::ApiError;
use hush_whisper::DraftError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    /// Rejected locally before anything was sent.
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl From<DraftError> for FeedError {
    fn from(e: DraftError) -> Self {
        FeedError::Validation(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;
