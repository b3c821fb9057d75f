//! Single-shot position resolution with a deterministic fallback.

use crate::coordinate::Coordinate;
use crate::source::{LocationError, PositionSource};
use std::sync::Arc;
use std::time::Duration;

/// New York City center; used whenever the device cannot tell us.
pub const DEFAULT_FALLBACK: Coordinate = Coordinate::new(40.7128, -74.0060);

/// How long to wait for the device before falling back.
pub const DEFAULT_LOCATE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct LocatorConfig {
    pub fallback: Coordinate,
    pub timeout: Duration,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            fallback: DEFAULT_FALLBACK,
            timeout: DEFAULT_LOCATE_TIMEOUT,
        }
    }
}

/// Where a resolved coordinate came from.
#[derive(Debug, Clone, PartialEq)]
pub enum PositionOrigin {
    Device,
    Fallback(LocationError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub coordinate: Coordinate,
    pub origin: PositionOrigin,
}

impl Resolution {
    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, PositionOrigin::Fallback(_))
    }
}

/// Resolves the user's position. Never fails.
#[derive(Clone)]
pub struct GeoLocator {
    source: Option<Arc<dyn PositionSource>>,
    config: LocatorConfig,
}

impl GeoLocator {
    /// Locator over `source` with the default fallback and timeout.
    pub fn new(source: Arc<dyn PositionSource>) -> Self {
        Self::with_config(Some(source), LocatorConfig::default())
    }

    pub fn with_config(source: Option<Arc<dyn PositionSource>>, config: LocatorConfig) -> Self {
        Self { source, config }
    }

    /// A locator with no capability at all; always yields the fallback.
    pub fn fallback_only(config: LocatorConfig) -> Self {
        Self::with_config(None, config)
    }

    pub fn fallback(&self) -> Coordinate {
        self.config.fallback
    }

    /// Device position, or the fallback when it cannot be had.
    pub async fn resolve(&self) -> Coordinate {
        self.resolve_detailed().await.coordinate
    }

    /// Like [`GeoLocator::resolve`], also reporting why a fallback was used.
    pub async fn resolve_detailed(&self) -> Resolution {
        let result = match &self.source {
            None => Err(LocationError::Unavailable(
                "no position source configured".to_string(),
            )),
            Some(source) => {
                match tokio::time::timeout(self.config.timeout, source.current_position()).await {
                    Ok(result) => result,
                    Err(_) => Err(LocationError::Timeout),
                }
            }
        };

        match result {
            Ok(coordinate) if coordinate.is_valid() => {
                tracing::debug!(%coordinate, "resolved device position");
                Resolution {
                    coordinate,
                    origin: PositionOrigin::Device,
                }
            }
            Ok(coordinate) => self.fall_back(LocationError::Unavailable(format!(
                "device reported invalid coordinate {coordinate}"
            ))),
            Err(e) => self.fall_back(e),
        }
    }

    fn fall_back(&self, reason: LocationError) -> Resolution {
        tracing::warn!(
            error = %reason,
            fallback = %self.config.fallback,
            "location unavailable, using fallback"
        );
        Resolution {
            coordinate: self.config.fallback,
            origin: PositionOrigin::Fallback(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{FixedPositionSource, NullPositionSource};
    use async_trait::async_trait;

    struct DeniedSource;

    #[async_trait]
    impl PositionSource for DeniedSource {
        async fn current_position(&self) -> Result<Coordinate, LocationError> {
            Err(LocationError::Denied)
        }
    }

    struct HangingSource;

    #[async_trait]
    impl PositionSource for HangingSource {
        async fn current_position(&self) -> Result<Coordinate, LocationError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_device_position_wins() {
        let here = Coordinate::new(41.3874, 2.1686);
        let locator = GeoLocator::new(Arc::new(FixedPositionSource(here)));

        let resolution = locator.resolve_detailed().await;
        assert_eq!(resolution.coordinate, here);
        assert_eq!(resolution.origin, PositionOrigin::Device);
    }

    #[tokio::test]
    async fn test_denied_uses_fallback() {
        let locator = GeoLocator::new(Arc::new(DeniedSource));

        let resolution = locator.resolve_detailed().await;
        assert_eq!(resolution.coordinate, DEFAULT_FALLBACK);
        assert_eq!(resolution.origin, PositionOrigin::Fallback(LocationError::Denied));
    }

    #[tokio::test]
    async fn test_missing_capability_uses_fallback() {
        let locator = GeoLocator::new(Arc::new(NullPositionSource));
        assert_eq!(locator.resolve().await, DEFAULT_FALLBACK);

        let locator = GeoLocator::fallback_only(LocatorConfig::default());
        assert!(locator.resolve_detailed().await.is_fallback());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_uses_fallback() {
        let config = LocatorConfig {
            fallback: Coordinate::new(1.0, 2.0),
            timeout: Duration::from_millis(50),
        };
        let locator = GeoLocator::with_config(Some(Arc::new(HangingSource)), config);

        let resolution = locator.resolve_detailed().await;
        assert_eq!(resolution.coordinate, Coordinate::new(1.0, 2.0));
        assert_eq!(resolution.origin, PositionOrigin::Fallback(LocationError::Timeout));
    }

    #[tokio::test]
    async fn test_invalid_device_coordinate_uses_fallback() {
        let locator = GeoLocator::new(Arc::new(FixedPositionSource(Coordinate::new(200.0, 0.0))));
        assert!(locator.resolve_detailed().await.is_fallback());
    }
}
