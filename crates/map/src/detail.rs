//! The small map on a single whisper's page.

use chrono::{DateTime, Utc};
use hush_geo::Coordinate;
use hush_whisper::Whisper;

use crate::config::MapConfig;
use crate::engine::MapSyncEngine;
use crate::surface::{MapBackend, MapView};

/// Mounts a map centered on `whisper` at the detail zoom, showing its badge
/// and, when known, the user's marker.
///
/// The returned engine owns the surface; drop or dispose it when the page
/// goes away.
pub fn detail_map<B: MapBackend>(
    backend: B,
    config: MapConfig,
    whisper: &Whisper,
    user_location: Option<Coordinate>,
    now: DateTime<Utc>,
) -> MapSyncEngine<B> {
    let view = MapView {
        center: whisper.position,
        zoom: config.detail_zoom,
    };
    let mut engine = MapSyncEngine::new(backend, config);
    engine.mount_view(view);
    engine.reconcile_at(std::slice::from_ref(whisper), user_location, now);
    engine
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::MarkerIcon;
    use crate::recording::{RecordingBackend, SurfaceCall};
    use chrono::TimeZone;
    use hush_whisper::Emotion;

    fn whisper() -> Whisper {
        Whisper {
            id: 8,
            text: "lanterns on the river".into(),
            emotion: Emotion::Peace,
            position: Coordinate::new(35.0116, 135.7681),
            created_at: Utc.with_ymd_and_hms(2024, 8, 16, 20, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_centered_on_whisper_at_detail_zoom() {
        let backend = RecordingBackend::new();
        let w = whisper();
        let engine = detail_map(backend.clone(), MapConfig::default(), &w, None, w.created_at);

        assert_eq!(
            backend.calls()[0],
            SurfaceCall::Construct(MapView {
                center: w.position,
                zoom: 15
            })
        );
        assert_eq!(engine.bound_ids(), vec![8]);
        assert_eq!(engine.user_marker(), None);
        let markers = backend.markers();
        assert_eq!(markers.len(), 1);
        assert!(matches!(
            markers[0].1.spec.icon,
            MarkerIcon::Emotion { emoji: "😌", .. }
        ));
    }

    #[test]
    fn test_includes_user_marker_when_known() {
        let backend = RecordingBackend::new();
        let w = whisper();
        let user = Coordinate::new(35.0, 135.76);
        let engine = detail_map(backend.clone(), MapConfig::default(), &w, Some(user), w.created_at);

        assert!(engine.user_marker().is_some());
        assert_eq!(backend.markers().len(), 2);
        assert_eq!(engine.anchor(), Some(w.position));
    }
}
