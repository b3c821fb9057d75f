//! Whisper data source client.
//!
//! `WhisperRepository` is the seam the feed controller depends on;
//! `HttpWhisperRepository` is the reqwest-backed implementation talking to
//! the REST endpoint. No retries happen here: the caller owns retry policy.

mod config;
mod error;
mod http;
mod repository;

pub use config::{ApiConfig, DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT};
pub use error::{ApiError, Result};
pub use http::{decode_feed, HttpWhisperRepository};
pub use repository::{WhisperRepository, WhisperRepositoryRef};
