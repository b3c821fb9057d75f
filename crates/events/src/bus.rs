//! Event bus abstraction.
//!
//! Controllers publish state transitions through an `EventBus` so that any
//! presentation (a desktop shell, the CLI, a test) can observe them without
//! the controller knowing who is listening.

use serde::Serialize;
use std::sync::{Arc, Mutex};

/// Sink for published events.
pub trait EventBus: Send + Sync {
    /// Publish `payload` under `topic` (see [`crate::event_names`]).
    fn emit(&self, topic: &str, payload: serde_json::Value);
}

/// Shared event bus handle.
pub type EventBusRef = Arc<dyn EventBus>;

/// Typed publishing on top of [`EventBus::emit`].
pub trait EventBusExt {
    fn publish<T: Serialize>(&self, topic: &str, event: &T);
}

impl<B: EventBus + ?Sized> EventBusExt for B {
    fn publish<T: Serialize>(&self, topic: &str, event: &T) {
        match serde_json::to_value(event) {
            Ok(payload) => self.emit(topic, payload),
            Err(e) => tracing::warn!(topic, error = %e, "dropping unserializable event"),
        }
    }
}

/// A published event, as captured by [`InMemoryEventBus`].
#[derive(Debug, Clone)]
pub struct EmittedEvent {
    pub topic: String,
    pub payload: serde_json::Value,
}

/// Bus that keeps every event in memory. Used by tests and the CLI.
#[derive(Default)]
pub struct InMemoryEventBus {
    events: Mutex<Vec<EmittedEvent>>,
}

impl InMemoryEventBus {
    /// Create an empty in-memory bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured events, oldest first.
    pub fn events(&self) -> Vec<EmittedEvent> {
        self.lock().clone()
    }

    /// Captured events on `topic`, oldest first.
    pub fn events_for(&self, topic: &str) -> Vec<EmittedEvent> {
        self.lock()
            .iter()
            .filter(|e| e.topic == topic)
            .cloned()
            .collect()
    }

    /// Payload of the most recent event on `topic`.
    pub fn last_payload(&self, topic: &str) -> Option<serde_json::Value> {
        self.lock()
            .iter()
            .rev()
            .find(|e| e.topic == topic)
            .map(|e| e.payload.clone())
    }

    /// Drop everything captured so far.
    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<EmittedEvent>> {
        self.events.lock().expect("event bus mutex poisoned")
    }
}

impl EventBus for InMemoryEventBus {
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        self.lock().push(EmittedEvent {
            topic: topic.to_string(),
            payload,
        });
    }
}

/// Discards everything.
pub struct NullEventBus;

impl EventBus for NullEventBus {
    fn emit(&self, _topic: &str, _payload: serde_json::Value) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_in_memory_bus_filters_by_topic() {
        let bus = InMemoryEventBus::new();

        bus.emit("feed:a", json!({"n": 1}));
        bus.emit("feed:b", json!({"n": 2}));
        bus.emit("feed:a", json!({"n": 3}));

        assert_eq!(bus.len(), 3);
        assert_eq!(bus.events_for("feed:a").len(), 2);
        assert_eq!(bus.last_payload("feed:a"), Some(json!({"n": 3})));
        assert_eq!(bus.last_payload("feed:missing"), None);
    }

    #[test]
    fn test_publish_serializes() {
        #[derive(Serialize)]
        struct Ping {
            id: u32,
        }

        let bus = InMemoryEventBus::new();
        bus.publish("ping", &Ping { id: 9 });
        assert_eq!(bus.last_payload("ping"), Some(json!({"id": 9})));

        bus.clear();
        assert!(bus.is_empty());
    }

    #[test]
    fn test_null_bus_accepts_anything() {
        NullEventBus.publish("anything", &json!({"ignored": true}));
    }
}
