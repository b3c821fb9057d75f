#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Transport failure, non-success status or an unreadable body.
    #[error("{0}")]
    Network(String),
    #[error("{0}")]
    NotFound(String),
    /// The data source rejected a submission.
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    /// Worth offering a "Try again" affordance for.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Network(format!("request failed: {e}"))
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
