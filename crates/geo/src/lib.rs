//! Geographic primitives for hush.
//!
//! This crate owns everything that turns "where am I" and "when was this
//! posted" into values the feed can use:
//! - `Coordinate`: immutable latitude/longitude pair
//! - `GeoLocator`: single-shot position resolution with a fixed fallback
//! - `distance` / `clock`: pure formatting helpers (haversine, "5m ago")
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      Domain Layer                         │
//! │  coordinate.rs - Coordinate value type                   │
//! │  distance.rs   - haversine + distance labels (pure)      │
//! │  clock.rs      - relative / absolute time labels (pure)  │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Capability Layer                        │
//! │  source.rs  - PositionSource trait + Null/Fixed sources  │
//! │  locator.rs - GeoLocator (timeout + fallback)            │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod clock;
mod coordinate;
mod distance;
mod locator;
mod source;

pub use clock::{format_full_date, format_relative_time};
pub use coordinate::Coordinate;
pub use distance::{describe_distance, distance_km, format_distance, EARTH_RADIUS_KM};
pub use locator::{
    GeoLocator, LocatorConfig, PositionOrigin, Resolution, DEFAULT_FALLBACK,
    DEFAULT_LOCATE_TIMEOUT,
};
pub use source::{FixedPositionSource, LocationError, NullPositionSource, PositionSource};
