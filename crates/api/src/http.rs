use async_trait::async_trait;
use hush_geo::Coordinate;
use hush_whisper::{Emotion, Whisper, WhisperDraft, WhisperId};
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, CONTENT_TYPE};
use reqwest::{StatusCode, Url};

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::repository::WhisperRepository;

const USER_AGENT: &str = concat!("hush/", env!("CARGO_PKG_VERSION"));
const CREATE_FAILED: &str = "Failed to create whisper";
const NOT_FOUND: &str = "Whisper not found";

/// Decodes a feed response body. Blank bodies are an empty feed.
pub fn decode_feed(body: &str) -> Result<Vec<Whisper>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(body).map_err(|e| ApiError::Network(format!("invalid response: {e}")))
}

/// reqwest-backed repository. One client per instance.
pub struct HttpWhisperRepository {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpWhisperRepository {
    /// Builds the client with the configured timeout and default headers.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build http client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> Result<Url> {
        let raw = format!("{}/{}", self.config.base_url, path);
        Url::parse(&raw).map_err(|e| ApiError::Network(format!("invalid url '{raw}': {e}")))
    }

    pub(crate) fn feed_url(&self, center: Coordinate, emotion: Option<Emotion>) -> Result<Url> {
        let mut url = self.url("whispers/feed")?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("lat", &center.latitude.to_string())
                .append_pair("lng", &center.longitude.to_string());
            if let Some(emotion) = emotion {
                query.append_pair("emotion", emotion.value());
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl WhisperRepository for HttpWhisperRepository {
    async fn fetch_nearby(
        &self,
        center: Coordinate,
        emotion: Option<Emotion>,
    ) -> Result<Vec<Whisper>> {
        let url = self.feed_url(center, emotion)?;
        tracing::debug!(%url, "fetching feed");

        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Network(format!(
                "Failed to fetch whispers: {}",
                status.as_u16()
            )));
        }

        let body = resp.text().await?;
        let whispers = decode_feed(&body)?;
        tracing::debug!(count = whispers.len(), "feed fetched");
        Ok(whispers)
    }

    async fn fetch_by_id(&self, id: WhisperId) -> Result<Whisper> {
        if id <= 0 {
            return Err(ApiError::NotFound(NOT_FOUND.to_string()));
        }

        let url = self.url(&format!("whispers/{id}"))?;
        let resp = self.client.get(url).send().await?;
        let status = resp.status();

        if status.is_client_error() {
            return Err(ApiError::NotFound(NOT_FOUND.to_string()));
        }
        if !status.is_success() {
            return Err(ApiError::Network(format!(
                "Failed to fetch whisper {id}: {}",
                status.as_u16()
            )));
        }

        resp.json::<Whisper>()
            .await
            .map_err(|e| ApiError::Network(format!("invalid response: {e}")))
    }

    async fn create(&self, draft: &WhisperDraft) -> Result<()> {
        let url = self.url("whispers")?;
        let resp = self.client.post(url).json(draft).send().await?;
        let status = resp.status();

        if status.is_success() {
            tracing::info!(emotion = %draft.emotion(), "whisper created");
            return Ok(());
        }

        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY {
            let body = resp.text().await.unwrap_or_default();
            let message = body.trim();
            let message = if message.is_empty() {
                CREATE_FAILED.to_string()
            } else {
                message.to_string()
            };
            return Err(ApiError::Validation(message));
        }

        Err(ApiError::Network(format!(
            "{CREATE_FAILED}: {}",
            status.as_u16()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> HttpWhisperRepository {
        HttpWhisperRepository::new(ApiConfig::new("http://localhost:8080/api")).unwrap()
    }

    #[test]
    fn test_feed_url_without_emotion() {
        let url = repo().feed_url(Coordinate::new(40.7128, -74.006), None).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/whispers/feed?lat=40.7128&lng=-74.006"
        );
    }

    #[test]
    fn test_feed_url_with_emotion() {
        let url = repo()
            .feed_url(Coordinate::new(1.5, 2.0), Some(Emotion::Melancholy))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/whispers/feed?lat=1.5&lng=2&emotion=melancholy"
        );
    }

    #[test]
    fn test_decode_blank_body_is_empty_feed() {
        assert_eq!(decode_feed("").unwrap(), Vec::new());
        assert_eq!(decode_feed("  \n").unwrap(), Vec::new());
        assert_eq!(decode_feed("[]").unwrap(), Vec::new());
    }

    #[test]
    fn test_decode_garbage_is_network_error() {
        let err = decode_feed("<html>oops</html>").unwrap_err();
        assert!(matches!(err, ApiError::Network(ref m) if m.starts_with("invalid response")));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_decode_records() {
        let body = r#"[
            {"id":1,"text":"a","emotion":"JOY","latitude":1.0,"longitude":2.0,"createdAt":"2024-01-01T00:00:00Z"},
            {"id":2,"text":"b","emotion":"PEACE","latitude":1.0,"longitude":2.0,"createdAt":"2024-01-01T00:00:00"}
        ]"#;
        let whispers = decode_feed(body).unwrap();
        assert_eq!(whispers.iter().map(|w| w.id).collect::<Vec<_>>(), vec![1, 2]);
    }
}
