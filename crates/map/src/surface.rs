//! Capabilities the engine needs from a map renderer.

use hush_geo::Coordinate;
use hush_whisper::WhisperId;
use std::sync::Arc;

use crate::marker::{MarkerHandle, MarkerSpec, Popup};

/// Called with the whisper id when a popup's action is used.
pub type ActivationHandler = Arc<dyn Fn(WhisperId) + Send + Sync>;

/// Initial camera of a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: u8,
}

/// Raster base layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
}

/// Builds surfaces.
///
/// The activation handler is fixed at construction; a surface has exactly
/// one, and it is the only way popup actions reach the application.
pub trait MapBackend {
    type Surface: MapSurface;

    fn construct(&self, view: MapView, on_activate: ActivationHandler) -> Self::Surface;
}

/// A live, retained-mode map.
pub trait MapSurface {
    fn add_tile_layer(&mut self, layer: &TileLayer);

    fn create_marker(&mut self, spec: &MarkerSpec) -> MarkerHandle;

    fn set_popup(&mut self, handle: MarkerHandle, popup: &Popup);

    /// Unknown handles are ignored.
    fn remove_marker(&mut self, handle: MarkerHandle);

    /// Tears the surface down. Nothing is called on it afterwards.
    fn release(&mut self);
}
