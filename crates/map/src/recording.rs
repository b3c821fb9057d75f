//! In-memory map surface.
//!
//! Records every call made on it so the engine can be exercised without a
//! renderer. The CLI uses it to print what a real map would show.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::marker::{MarkerHandle, MarkerSpec, Popup};
use crate::surface::{ActivationHandler, MapBackend, MapSurface, MapView, TileLayer};

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Construct(MapView),
    AddTileLayer(TileLayer),
    CreateMarker { handle: MarkerHandle, spec: MarkerSpec },
    SetPopup { handle: MarkerHandle, popup: Popup },
    RemoveMarker(MarkerHandle),
    Release,
}

/// A marker currently on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveMarker {
    pub spec: MarkerSpec,
    pub popup: Option<Popup>,
}

#[derive(Default)]
struct Shared {
    calls: Vec<SurfaceCall>,
    markers: BTreeMap<MarkerHandle, LiveMarker>,
    tile_layers: Vec<TileLayer>,
    handler: Option<ActivationHandler>,
    next_handle: u64,
    released: bool,
}

/// Backend handing out [`RecordingSurface`]s.
///
/// Clones share one log, so a test can keep a clone while the engine owns
/// the surface.
#[derive(Clone, Default)]
pub struct RecordingBackend {
    shared: Arc<Mutex<Shared>>,
}

impl RecordingBackend {
    /// Create a backend with an empty call log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call made so far, oldest first.
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.lock().calls.clone()
    }

    /// Forget recorded calls; live markers are kept.
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// How many surfaces were built.
    pub fn construct_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, SurfaceCall::Construct(_)))
            .count()
    }

    /// Base layers on the live surface.
    pub fn tile_layers(&self) -> Vec<TileLayer> {
        self.lock().tile_layers.clone()
    }

    /// Markers currently on the surface, in creation order.
    pub fn markers(&self) -> Vec<(MarkerHandle, LiveMarker)> {
        self.lock()
            .markers
            .iter()
            .map(|(h, m)| (*h, m.clone()))
            .collect()
    }

    /// Live markers that carry a whisper, i.e. excluding the user pin.
    pub fn interactive_marker_count(&self) -> usize {
        self.lock()
            .markers
            .values()
            .filter(|m| m.spec.interactive)
            .count()
    }

    /// Whether the last surface was released.
    pub fn is_released(&self) -> bool {
        self.lock().released
    }

    /// Presses the action button in `handle`'s popup.
    ///
    /// Returns `false` when the marker is gone or has no action.
    pub fn activate(&self, handle: MarkerHandle) -> bool {
        let (handler, whisper_id) = {
            let shared = self.lock();
            let Some(id) = shared
                .markers
                .get(&handle)
                .and_then(|m| m.popup.as_ref())
                .and_then(|p| p.action())
                .map(|a| a.whisper_id)
            else {
                return false;
            };
            let Some(handler) = shared.handler.clone() else {
                return false;
            };
            (handler, id)
        };
        handler(whisper_id);
        true
    }

    /// Invokes the surface's handler directly, as a stale popup still on
    /// screen would.
    pub fn activate_id(&self, whisper_id: hush_whisper::WhisperId) -> bool {
        let handler = self.lock().handler.clone();
        match handler {
            Some(handler) => {
                handler(whisper_id);
                true
            }
            None => false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().expect("recording surface mutex poisoned")
    }
}

impl MapBackend for RecordingBackend {
    type Surface = RecordingSurface;

    fn construct(&self, view: MapView, on_activate: ActivationHandler) -> RecordingSurface {
        let mut shared = self.lock();
        shared.calls.push(SurfaceCall::Construct(view));
        shared.handler = Some(on_activate);
        shared.released = false;
        RecordingSurface {
            shared: self.shared.clone(),
        }
    }
}

/// Surface handed out by [`RecordingBackend`]; writes into its log.
pub struct RecordingSurface {
    shared: Arc<Mutex<Shared>>,
}

impl RecordingSurface {
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().expect("recording surface mutex poisoned")
    }
}

impl MapSurface for RecordingSurface {
    fn add_tile_layer(&mut self, layer: &TileLayer) {
        let mut shared = self.lock();
        shared.calls.push(SurfaceCall::AddTileLayer(layer.clone()));
        shared.tile_layers.push(layer.clone());
    }

    fn create_marker(&mut self, spec: &MarkerSpec) -> MarkerHandle {
        let mut shared = self.lock();
        shared.next_handle += 1;
        let handle = MarkerHandle(shared.next_handle);
        shared.calls.push(SurfaceCall::CreateMarker {
            handle,
            spec: spec.clone(),
        });
        shared.markers.insert(
            handle,
            LiveMarker {
                spec: spec.clone(),
                popup: None,
            },
        );
        handle
    }

    fn set_popup(&mut self, handle: MarkerHandle, popup: &Popup) {
        let mut shared = self.lock();
        shared.calls.push(SurfaceCall::SetPopup {
            handle,
            popup: popup.clone(),
        });
        if let Some(marker) = shared.markers.get_mut(&handle) {
            marker.popup = Some(popup.clone());
        }
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        let mut shared = self.lock();
        shared.calls.push(SurfaceCall::RemoveMarker(handle));
        shared.markers.remove(&handle);
    }

    fn release(&mut self) {
        let mut shared = self.lock();
        shared.calls.push(SurfaceCall::Release);
        shared.markers.clear();
        shared.tile_layers.clear();
        shared.released = true;
    }
}
