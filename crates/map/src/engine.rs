//! Marker reconciliation.
//!
//! Lifecycle per surface: `Uninitialized` -> `Active` on the first mount,
//! `Active` -> `Disposed` on dispose. The surface is built exactly once; a
//! reconciliation pass only ever touches markers, never the tile layer.

use chrono::{DateTime, Utc};
use hush_events::{event_names, EventBusExt, EventBusRef, MarkerActivatedEvent, NullEventBus};
use hush_geo::Coordinate;
use hush_whisper::{Whisper, WhisperId};
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::MapConfig;
use crate::marker::{user_marker, user_popup, whisper_marker, whisper_popup, MarkerHandle};
use crate::surface::{ActivationHandler, MapBackend, MapSurface, MapView};

/// Outcome of one reconciliation pass. The user marker is not counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileStats {
    pub added: usize,
    pub removed: usize,
    pub retained: usize,
}

impl ReconcileStats {
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

struct Mounted<S> {
    surface: S,
    anchor: Coordinate,
    /// Whisper id -> marker currently showing it.
    bindings: BTreeMap<WhisperId, MarkerHandle>,
    user: Option<(Coordinate, MarkerHandle)>,
}

enum Lifecycle<S> {
    Uninitialized,
    Active(Mounted<S>),
    Disposed,
}

/// Where surface activations are routed.
#[derive(Default)]
struct Bridge {
    callback: Option<ActivationHandler>,
    closed: bool,
}

/// Sole owner and mutator of one map surface.
pub struct MapSyncEngine<B: MapBackend> {
    backend: B,
    config: MapConfig,
    events: EventBusRef,
    bridge: Arc<Mutex<Bridge>>,
    lifecycle: Lifecycle<B::Surface>,
}

impl<B: MapBackend> MapSyncEngine<B> {
    /// Unmounted engine. Nothing is built until [`MapSyncEngine::mount`].
    pub fn new(backend: B, config: MapConfig) -> Self {
        Self {
            backend,
            config,
            events: Arc::new(NullEventBus),
            bridge: Arc::new(Mutex::new(Bridge::default())),
            lifecycle: Lifecycle::Uninitialized,
        }
    }

    /// Publish `map:marker_activated` on `events`.
    pub fn with_event_bus(mut self, events: EventBusRef) -> Self {
        self.events = events;
        self
    }

    pub fn is_active(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Active(_))
    }

    pub fn is_disposed(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Disposed)
    }

    /// Center the surface was built with.
    pub fn anchor(&self) -> Option<Coordinate> {
        match &self.lifecycle {
            Lifecycle::Active(m) => Some(m.anchor),
            _ => None,
        }
    }

    /// Ids of whispers that currently have a marker, ascending.
    pub fn bound_ids(&self) -> Vec<WhisperId> {
        match &self.lifecycle {
            Lifecycle::Active(m) => m.bindings.keys().copied().collect(),
            _ => Vec::new(),
        }
    }

    /// Marker bound to whisper `id`, if any.
    pub fn marker_for(&self, id: WhisperId) -> Option<MarkerHandle> {
        match &self.lifecycle {
            Lifecycle::Active(m) => m.bindings.get(&id).copied(),
            _ => None,
        }
    }

    /// The user-location marker, if shown.
    pub fn user_marker(&self) -> Option<MarkerHandle> {
        match &self.lifecycle {
            Lifecycle::Active(m) => m.user.map(|(_, h)| h),
            _ => None,
        }
    }

    /// Builds the surface around `anchor` at the configured zoom.
    ///
    /// Only the first call does anything: an active surface is never
    /// recentered, and a disposed engine stays disposed. Returns whether a
    /// surface was built.
    pub fn mount(&mut self, anchor: Coordinate) -> bool {
        let zoom = self.config.zoom;
        self.mount_view(MapView {
            center: anchor,
            zoom,
        })
    }

    /// [`MapSyncEngine::mount`] with an explicit zoom.
    pub fn mount_view(&mut self, view: MapView) -> bool {
        match self.lifecycle {
            Lifecycle::Uninitialized => {}
            Lifecycle::Active(_) => {
                tracing::debug!(anchor = %view.center, "map already mounted, keeping view");
                return false;
            }
            Lifecycle::Disposed => {
                tracing::debug!("mount after dispose ignored");
                return false;
            }
        }

        let mut surface = self.backend.construct(view, self.activation_handler());
        surface.add_tile_layer(&self.config.tile_layer());
        tracing::info!(anchor = %view.center, zoom = view.zoom, "map surface mounted");

        self.lifecycle = Lifecycle::Active(Mounted {
            surface,
            anchor: view.center,
            bindings: BTreeMap::new(),
            user: None,
        });
        true
    }

    /// Registers the handler for popup actions. Replaces any earlier one.
    pub fn on_marker_activated<F>(&self, callback: F)
    where
        F: Fn(WhisperId) + Send + Sync + 'static,
    {
        let mut bridge = lock(&self.bridge);
        if bridge.closed {
            return;
        }
        bridge.callback = Some(Arc::new(callback));
    }

    /// [`MapSyncEngine::reconcile_at`] with the current time.
    pub fn reconcile(
        &mut self,
        whispers: &[Whisper],
        user_location: Option<Coordinate>,
    ) -> ReconcileStats {
        self.reconcile_at(whispers, user_location, Utc::now())
    }

    /// Brings the marker set in line with `whispers` and `user_location`.
    ///
    /// `now` is used for the relative time in newly created popups.
    pub fn reconcile_at(
        &mut self,
        whispers: &[Whisper],
        user_location: Option<Coordinate>,
        now: DateTime<Utc>,
    ) -> ReconcileStats {
        let Lifecycle::Active(mounted) = &mut self.lifecycle else {
            tracing::debug!("reconcile on inactive map ignored");
            return ReconcileStats::default();
        };

        let wanted: HashSet<WhisperId> = whispers.iter().map(|w| w.id).collect();
        let mut stats = ReconcileStats::default();

        let stale: Vec<WhisperId> = mounted
            .bindings
            .keys()
            .filter(|id| !wanted.contains(id))
            .copied()
            .collect();
        for id in stale {
            if let Some(handle) = mounted.bindings.remove(&id) {
                mounted.surface.remove_marker(handle);
                stats.removed += 1;
            }
        }

        let mut seen = HashSet::with_capacity(whispers.len());
        for whisper in whispers {
            if !seen.insert(whisper.id) {
                continue;
            }
            if mounted.bindings.contains_key(&whisper.id) {
                stats.retained += 1;
                continue;
            }
            let handle = mounted.surface.create_marker(&whisper_marker(whisper));
            mounted.surface.set_popup(handle, &whisper_popup(whisper, now));
            mounted.bindings.insert(whisper.id, handle);
            stats.added += 1;
        }

        sync_user_marker(mounted, user_location);

        tracing::debug!(
            added = stats.added,
            removed = stats.removed,
            retained = stats.retained,
            "map reconciled"
        );
        stats
    }

    /// Removes every marker and releases the surface. Later calls on the
    /// engine are no-ops and late activations are dropped.
    pub fn dispose(&mut self) {
        {
            let mut bridge = lock(&self.bridge);
            bridge.closed = true;
            bridge.callback = None;
        }

        match std::mem::replace(&mut self.lifecycle, Lifecycle::Disposed) {
            Lifecycle::Active(mut mounted) => {
                for (_, handle) in std::mem::take(&mut mounted.bindings) {
                    mounted.surface.remove_marker(handle);
                }
                if let Some((_, handle)) = mounted.user.take() {
                    mounted.surface.remove_marker(handle);
                }
                mounted.surface.release();
                tracing::info!("map surface disposed");
            }
            Lifecycle::Uninitialized | Lifecycle::Disposed => {}
        }
    }

    /// The one handler given to the surface. Looks the callback up at call
    /// time so later registrations take effect.
    fn activation_handler(&self) -> ActivationHandler {
        let bridge = self.bridge.clone();
        let events = self.events.clone();
        Arc::new(move |whisper_id| {
            let callback = {
                let bridge = lock(&bridge);
                if bridge.closed {
                    tracing::debug!(whisper_id, "activation after dispose ignored");
                    return;
                }
                bridge.callback.clone()
            };
            events.publish(
                event_names::MARKER_ACTIVATED,
                &MarkerActivatedEvent { whisper_id },
            );
            match callback {
                Some(callback) => callback(whisper_id),
                None => tracing::debug!(whisper_id, "marker activated with no handler"),
            }
        })
    }
}

impl<B: MapBackend> Drop for MapSyncEngine<B> {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn sync_user_marker<S: MapSurface>(mounted: &mut Mounted<S>, location: Option<Coordinate>) {
    match (mounted.user, location) {
        (Some((current, _)), Some(next)) if current == next => {}
        (current, next) => {
            if let Some((_, handle)) = current {
                mounted.surface.remove_marker(handle);
                mounted.user = None;
            }
            if let Some(next) = next {
                let handle = mounted.surface.create_marker(&user_marker(next));
                mounted.surface.set_popup(handle, &user_popup());
                mounted.user = Some((next, handle));
            }
        }
    }
}

fn lock(bridge: &Mutex<Bridge>) -> MutexGuard<'_, Bridge> {
    bridge.lock().expect("activation bridge mutex poisoned")
}
