//! Position source traits.
//!
//! A `PositionSource` is the device's location capability. It is allowed to
//! fail; `GeoLocator` is what turns failures into a usable coordinate.

use crate::coordinate::Coordinate;
use async_trait::async_trait;

/// Why the device could not report a position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("location permission denied")]
    Denied,
    #[error("location request timed out")]
    Timeout,
    #[error("location unavailable: {0}")]
    Unavailable(String),
}

/// Provider for the device's current position.
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// Single-shot position request.
    async fn current_position(&self) -> Result<Coordinate, LocationError>;
}

/// Source for platforms without any location capability.
pub struct NullPositionSource;

#[async_trait]
impl PositionSource for NullPositionSource {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        Err(LocationError::Unavailable(
            "no location capability".to_string(),
        ))
    }
}

/// Source that always reports the same coordinate (e.g. from CLI flags).
pub struct FixedPositionSource(pub Coordinate);

#[async_trait]
impl PositionSource for FixedPositionSource {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        Ok(self.0)
    }
}
