//! Reconciliation tests against the recording surface.

use chrono::{TimeZone, Utc};
use hush_events::{event_names, InMemoryEventBus};
use hush_geo::Coordinate;
use hush_map::{
    MapConfig, MapSyncEngine, MapView, MarkerIcon, Popup, RecordingBackend, ReconcileStats,
    SurfaceCall,
};
use hush_whisper::{Emotion, Whisper, WhisperId};
use std::sync::{Arc, Mutex};

const HOME: Coordinate = Coordinate::new(40.7128, -74.0060);
const PARK: Coordinate = Coordinate::new(40.7829, -73.9654);

fn whisper(id: WhisperId, emotion: Emotion) -> Whisper {
    whisper_at(id, emotion, PARK)
}

fn whisper_at(id: WhisperId, emotion: Emotion, at: Coordinate) -> Whisper {
    Whisper {
        id,
        text: format!("whisper {id}"),
        emotion,
        position: at,
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
    }
}

fn mounted() -> (MapSyncEngine<RecordingBackend>, RecordingBackend) {
    let backend = RecordingBackend::new();
    let mut engine = MapSyncEngine::new(backend.clone(), MapConfig::default());
    assert!(engine.mount(HOME));
    (engine, backend)
}

fn stats(added: usize, removed: usize, retained: usize) -> ReconcileStats {
    ReconcileStats {
        added,
        removed,
        retained,
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

mod lifecycle {
    use super::*;

    #[test]
    fn test_mount_builds_surface_once() {
        let (mut engine, backend) = mounted();

        assert!(!engine.mount(PARK));
        assert_eq!(backend.construct_count(), 1);
        assert_eq!(backend.tile_layers().len(), 1);
        assert_eq!(engine.anchor(), Some(HOME));
        assert_eq!(
            backend.calls()[0],
            SurfaceCall::Construct(MapView {
                center: HOME,
                zoom: 13
            })
        );
    }

    #[test]
    fn test_reconcile_before_mount_is_noop() {
        let backend = RecordingBackend::new();
        let mut engine = MapSyncEngine::new(backend.clone(), MapConfig::default());

        let result = engine.reconcile(&[whisper(1, Emotion::Joy)], Some(HOME));
        assert_eq!(result, ReconcileStats::default());
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_dispose_removes_everything_and_releases() {
        let (mut engine, backend) = mounted();
        engine.reconcile(&[whisper(1, Emotion::Joy), whisper(2, Emotion::Peace)], Some(HOME));

        engine.dispose();

        assert!(engine.is_disposed());
        assert!(backend.is_released());
        assert!(backend.markers().is_empty());
        assert_eq!(backend.calls().last(), Some(&SurfaceCall::Release));
    }

    #[test]
    fn test_calls_after_dispose_are_noops() {
        let (mut engine, backend) = mounted();
        engine.dispose();
        backend.clear_calls();

        let result = engine.reconcile(&[whisper(1, Emotion::Joy)], Some(HOME));
        assert_eq!(result, ReconcileStats::default());
        assert!(!engine.mount(HOME));
        engine.dispose();
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_drop_releases_surface() {
        let (engine, backend) = mounted();
        drop(engine);
        assert!(backend.is_released());
    }
}

// =============================================================================
// Reconciliation
// =============================================================================

mod reconcile {
    use super::*;

    #[test]
    fn test_first_pass_adds_one_marker_per_whisper() {
        let (mut engine, backend) = mounted();
        let feed = [whisper(1, Emotion::Joy), whisper(2, Emotion::Anxiety)];

        assert_eq!(engine.reconcile(&feed, None), stats(2, 0, 0));
        assert_eq!(engine.bound_ids(), vec![1, 2]);
        assert_eq!(backend.interactive_marker_count(), 2);
    }

    #[test]
    fn test_repeat_pass_is_idempotent() {
        let (mut engine, backend) = mounted();
        let feed = [whisper(1, Emotion::Joy), whisper(2, Emotion::Anxiety)];
        engine.reconcile(&feed, Some(HOME));
        backend.clear_calls();

        assert_eq!(engine.reconcile(&feed, Some(HOME)), stats(0, 0, 2));
        assert!(backend.calls().is_empty(), "stable markers must not churn");
    }

    #[test]
    fn test_diff_only_touches_changed_ids() {
        let (mut engine, backend) = mounted();
        engine.reconcile(
            &[whisper(1, Emotion::Joy), whisper(2, Emotion::Joy), whisper(3, Emotion::Joy)],
            None,
        );
        let kept = engine.marker_for(2);
        backend.clear_calls();

        let result = engine.reconcile(
            &[whisper(2, Emotion::Joy), whisper(4, Emotion::Peace)],
            None,
        );

        assert_eq!(result, stats(1, 2, 1));
        assert_eq!(engine.bound_ids(), vec![2, 4]);
        assert_eq!(engine.marker_for(2), kept);
        let removals = backend
            .calls()
            .iter()
            .filter(|c| matches!(c, SurfaceCall::RemoveMarker(_)))
            .count();
        assert_eq!(removals, 2);
    }

    #[test]
    fn test_filter_change_then_clear() {
        let (mut engine, backend) = mounted();
        let all = [
            whisper(1, Emotion::Joy),
            whisper(2, Emotion::Anxiety),
            whisper(3, Emotion::Joy),
        ];
        engine.reconcile(&all, Some(HOME));

        let joy: Vec<_> = all.iter().filter(|w| w.emotion == Emotion::Joy).cloned().collect();
        assert_eq!(engine.reconcile(&joy, Some(HOME)), stats(0, 1, 2));
        assert_eq!(engine.reconcile(&all, Some(HOME)), stats(1, 0, 2));
        assert_eq!(backend.interactive_marker_count(), 3);
    }

    #[test]
    fn test_empty_collection_keeps_user_marker() {
        let (mut engine, backend) = mounted();
        engine.reconcile(&[whisper(1, Emotion::Joy)], Some(HOME));

        assert_eq!(engine.reconcile(&[], Some(HOME)), stats(0, 1, 0));
        let markers = backend.markers();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].1.spec.icon, MarkerIcon::UserLocation);
        assert!(!markers[0].1.spec.interactive);
    }

    #[test]
    fn test_same_coordinate_gets_independent_markers() {
        let (mut engine, backend) = mounted();
        let feed = [
            whisper_at(1, Emotion::Joy, HOME),
            whisper_at(2, Emotion::Melancholy, HOME),
        ];

        engine.reconcile(&feed, None);
        assert_eq!(backend.interactive_marker_count(), 2);
        assert_ne!(engine.marker_for(1), engine.marker_for(2));
    }

    #[test]
    fn test_duplicate_ids_bind_once() {
        let (mut engine, backend) = mounted();
        let feed = [whisper(7, Emotion::Joy), whisper(7, Emotion::Joy)];

        assert_eq!(engine.reconcile(&feed, None), stats(1, 0, 0));
        assert_eq!(backend.interactive_marker_count(), 1);
    }

    #[test]
    fn test_popup_is_bound_to_new_markers() {
        let (mut engine, backend) = mounted();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap();
        engine.reconcile_at(&[whisper(3, Emotion::Peace)], None, now);

        let (_, marker) = &backend.markers()[0];
        let Some(Popup::Whisper(popup)) = &marker.popup else {
            panic!("expected a whisper popup");
        };
        assert_eq!(popup.emoji, "😌");
        assert_eq!(popup.time_ago, "2h ago");
        assert_eq!(popup.action.whisper_id, 3);
        assert_eq!(popup.action.label, "Read Full Whisper");
    }
}

// =============================================================================
// User marker
// =============================================================================

mod user_marker {
    use super::*;

    #[test]
    fn test_user_marker_lifecycle() {
        let (mut engine, backend) = mounted();

        engine.reconcile(&[], None);
        assert_eq!(engine.user_marker(), None);

        engine.reconcile(&[], Some(HOME));
        let first = engine.user_marker();
        assert!(first.is_some());

        engine.reconcile(&[], Some(HOME));
        assert_eq!(engine.user_marker(), first);

        engine.reconcile(&[], Some(PARK));
        assert_ne!(engine.user_marker(), first);
        assert_eq!(backend.markers().len(), 1);

        engine.reconcile(&[], None);
        assert_eq!(engine.user_marker(), None);
        assert!(backend.markers().is_empty());
    }

    #[test]
    fn test_user_marker_not_counted() {
        let (mut engine, _backend) = mounted();
        assert_eq!(engine.reconcile(&[], Some(HOME)), ReconcileStats::default());
    }
}

// =============================================================================
// Activation
// =============================================================================

mod activation {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<WhisperId>>>, impl Fn(WhisperId) + Send + Sync + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |id| sink.lock().unwrap().push(id))
    }

    #[test]
    fn test_popup_action_reaches_callback() {
        let bus = Arc::new(InMemoryEventBus::new());
        let backend = RecordingBackend::new();
        let mut engine =
            MapSyncEngine::new(backend.clone(), MapConfig::default()).with_event_bus(bus.clone());
        engine.mount(HOME);
        let (seen, callback) = recorder();
        engine.on_marker_activated(callback);

        engine.reconcile(&[whisper(42, Emotion::Joy)], Some(HOME));
        let handle = engine.marker_for(42).unwrap();
        assert!(backend.activate(handle));

        assert_eq!(*seen.lock().unwrap(), vec![42]);
        let payload = bus.last_payload(event_names::MARKER_ACTIVATED).unwrap();
        assert_eq!(payload["whisper_id"], 42);
    }

    #[test]
    fn test_user_marker_has_no_action() {
        let (mut engine, backend) = mounted();
        let (seen, callback) = recorder();
        engine.on_marker_activated(callback);

        engine.reconcile(&[], Some(HOME));
        assert!(!backend.activate(engine.user_marker().unwrap()));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_latest_registration_wins() {
        let (mut engine, backend) = mounted();
        let (first, callback) = recorder();
        engine.on_marker_activated(callback);
        let (second, callback) = recorder();
        engine.on_marker_activated(callback);

        engine.reconcile(&[whisper(5, Emotion::Anxiety)], None);
        backend.activate(engine.marker_for(5).unwrap());

        assert!(first.lock().unwrap().is_empty());
        assert_eq!(*second.lock().unwrap(), vec![5]);
    }

    #[test]
    fn test_activation_after_dispose_is_ignored() {
        let (mut engine, backend) = mounted();
        let (seen, callback) = recorder();
        engine.on_marker_activated(callback);
        engine.reconcile(&[whisper(5, Emotion::Anxiety)], None);

        engine.dispose();
        backend.activate_id(5);

        assert!(seen.lock().unwrap().is_empty());
    }
}
