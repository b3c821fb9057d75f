//! The shared emotion filter.
//!
//! One `FilterState` is created per feed and cloned into every presentation
//! that narrows the collection (list, chips, map). All of them read the same
//! watch cell and filter with the same predicate.

use hush_events::{event_names, EventBusExt, EventBusRef, FilterChangedEvent, NullEventBus};
use hush_whisper::{Emotion, Whisper};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Keeps whispers matching `selected`; `None` keeps everything.
pub fn filter_whispers(whispers: &[Whisper], selected: Option<Emotion>) -> Vec<Whisper> {
    match selected {
        None => whispers.to_vec(),
        Some(emotion) => whispers
            .iter()
            .filter(|w| w.emotion == emotion)
            .cloned()
            .collect(),
    }
}

/// Observable "selected emotion" cell. Cloning shares the cell and the
/// bus it announces on.
#[derive(Clone)]
pub struct FilterState {
    tx: Arc<watch::Sender<Option<Emotion>>>,
    events: Arc<Mutex<EventBusRef>>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterState {
    /// Filter showing everything, announcing nowhere until a bus is bound.
    pub fn new() -> Self {
        Self::with_event_bus(Arc::new(NullEventBus))
    }

    /// Filter that publishes `feed:filter_changed` on every change.
    pub fn with_event_bus(events: EventBusRef) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            tx: Arc::new(tx),
            events: Arc::new(Mutex::new(events)),
        }
    }

    /// Routes `feed:filter_changed` to `events` for every clone of this cell.
    pub fn bind_event_bus(&self, events: EventBusRef) {
        *self.events.lock().expect("filter bus mutex poisoned") = events;
    }

    /// Currently selected emotion; `None` means "show all".
    pub fn get(&self) -> Option<Emotion> {
        *self.tx.borrow()
    }

    /// Sets the filter. Returns whether the value changed; setting the
    /// current value again notifies nobody.
    pub fn set(&self, emotion: Option<Emotion>) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == emotion {
                return false;
            }
            *current = emotion;
            true
        });
        if changed {
            self.announce(emotion);
        }
        changed
    }

    /// Chip behaviour: picking the active emotion again shows everything.
    pub fn toggle(&self, emotion: Emotion) -> Option<Emotion> {
        let mut next = None;
        self.tx.send_modify(|current| {
            next = if *current == Some(emotion) {
                None
            } else {
                Some(emotion)
            };
            *current = next;
        });
        self.announce(next);
        next
    }

    /// Back to "show all".
    pub fn clear(&self) -> bool {
        self.set(None)
    }

    /// Receiver that wakes on every change of the selected emotion.
    pub fn subscribe(&self) -> watch::Receiver<Option<Emotion>> {
        self.tx.subscribe()
    }

    /// Narrows `whispers` with the current value.
    pub fn apply(&self, whispers: &[Whisper]) -> Vec<Whisper> {
        filter_whispers(whispers, self.get())
    }

    fn announce(&self, emotion: Option<Emotion>) {
        tracing::debug!(emotion = ?emotion, "emotion filter changed");
        let events = self.events.lock().expect("filter bus mutex poisoned").clone();
        events.publish(event_names::FILTER_CHANGED, &FilterChangedEvent { emotion });
    }
}

/// Per-emotion counts over an unfiltered collection, for filter chips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmotionCounts {
    counts: [usize; 4],
}

impl EmotionCounts {
    /// Counts every whisper in `whispers` under its emotion.
    pub fn tally(whispers: &[Whisper]) -> Self {
        let mut counts = [0; 4];
        for w in whispers {
            counts[Self::slot(w.emotion)] += 1;
        }
        Self { counts }
    }

    /// Whispers tagged `emotion`.
    pub fn count(&self, emotion: Emotion) -> usize {
        self.counts[Self::slot(emotion)]
    }

    /// Size of the whole collection.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// How many whispers the filtered view shows for `selected`.
    pub fn shown(&self, selected: Option<Emotion>) -> usize {
        selected.map_or_else(|| self.total(), |e| self.count(e))
    }

    fn slot(emotion: Emotion) -> usize {
        match emotion {
            Emotion::Melancholy => 0,
            Emotion::Joy => 1,
            Emotion::Anxiety => 2,
            Emotion::Peace => 3,
        }
    }
}
