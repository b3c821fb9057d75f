//! Feed controller.
//!
//! Every fetch takes a generation number when it starts. Only the latest
//! generation may write its result; anything older that completes late is
//! dropped.

use hush_api::WhisperRepositoryRef;
use hush_events::{
    event_names, EventBusExt, EventBusRef, FeedStateChangedEvent, NullEventBus,
    WhisperCreatedEvent,
};
use hush_geo::{Coordinate, GeoLocator};
use hush_whisper::{DraftError, Emotion, Whisper, WhisperDraft};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::compose::Compose;
use crate::error::{FeedError, Result};
use crate::filter::{filter_whispers, EmotionCounts, FilterState};
use crate::state::{FeedState, ViewMode};

pub const LOCATION_UNAVAILABLE: &str = "Location not available. Please allow location access.";

struct Inner {
    state: FeedState,
    user_location: Option<Coordinate>,
    view_mode: ViewMode,
    compose: Compose,
    generation: u64,
}

/// Where a fetch gets its center from.
#[derive(Debug, Clone, Copy)]
enum Center {
    /// Ask the locator again.
    Resolve,
    /// Reuse the last applied location, resolving only if there is none.
    Reuse,
}

/// Owns the current feed snapshot and the actions that change it.
pub struct FeedController {
    locator: GeoLocator,
    repo: WhisperRepositoryRef,
    filter: FilterState,
    events: EventBusRef,
    has_event_bus: bool,
    inner: Mutex<Inner>,
}

impl FeedController {
    /// Controller in `Loading` with no location yet. Nothing is fetched
    /// until [`FeedController::initialize`].
    pub fn new(locator: GeoLocator, repo: WhisperRepositoryRef) -> Self {
        Self {
            locator,
            repo,
            filter: FilterState::new(),
            events: Arc::new(NullEventBus),
            has_event_bus: false,
            inner: Mutex::new(Inner {
                state: FeedState::Loading,
                user_location: None,
                view_mode: ViewMode::default(),
                compose: Compose::default(),
                generation: 0,
            }),
        }
    }

    /// Share an existing filter cell (e.g. one the map view also holds).
    ///
    /// When the controller already has a bus, the filter announces on it.
    pub fn with_filter(mut self, filter: FilterState) -> Self {
        if self.has_event_bus {
            filter.bind_event_bus(self.events.clone());
        }
        self.filter = filter;
        self
    }

    /// Publish state transitions, filter changes and submissions on `events`.
    pub fn with_event_bus(mut self, events: EventBusRef) -> Self {
        self.filter.bind_event_bus(events.clone());
        self.events = events;
        self.has_event_bus = true;
        self
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Snapshot of the unfiltered feed state.
    pub fn state(&self) -> FeedState {
        self.lock().state.clone()
    }

    /// Location of the last applied fetch, fallback included.
    pub fn user_location(&self) -> Option<Coordinate> {
        self.lock().user_location
    }

    /// Which presentation is showing the feed.
    pub fn view_mode(&self) -> ViewMode {
        self.lock().view_mode
    }

    /// The filter cell; clone it to share with another presentation.
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// The collection every presentation renders.
    pub fn filtered_whispers(&self) -> Vec<Whisper> {
        let selected = self.filter.get();
        filter_whispers(self.lock().state.whispers(), selected)
    }

    /// Chip counts over the unfiltered collection.
    pub fn emotion_counts(&self) -> EmotionCounts {
        EmotionCounts::tally(self.lock().state.whispers())
    }

    /// Narrows every presentation. Local only; nothing is refetched.
    pub fn set_filter(&self, emotion: Option<Emotion>) -> bool {
        self.filter.set(emotion)
    }

    // -------------------------------------------------------------------------
    // Fetching
    // -------------------------------------------------------------------------

    /// First load: resolve a position, then fetch around it.
    pub async fn initialize(&self) -> bool {
        tracing::info!("initializing feed");
        self.load(Center::Resolve).await
    }

    /// Re-resolve the position and fetch around the new one.
    pub async fn relocate(&self) -> bool {
        self.load(Center::Resolve).await
    }

    /// Fetch again around the last known position. Also the retry action.
    ///
    /// Returns `false` when a newer fetch superseded this one.
    pub async fn refetch(&self) -> bool {
        self.load(Center::Reuse).await
    }

    /// Switching presentation invalidates the previous fetch.
    pub async fn set_view_mode(&self, mode: ViewMode) -> bool {
        {
            let mut inner = self.lock();
            if inner.view_mode == mode {
                return false;
            }
            inner.view_mode = mode;
        }
        tracing::debug!(?mode, "view mode changed");
        self.refetch().await
    }

    async fn load(&self, center: Center) -> bool {
        let generation = self.begin();

        let location = match (center, self.user_location()) {
            (Center::Reuse, Some(known)) => known,
            _ => self.locator.resolve().await,
        };

        let result = self.repo.fetch_nearby(location, None).await;

        let next = match result {
            Ok(whispers) => FeedState::Ready { whispers },
            Err(e) => {
                tracing::warn!(generation, error = %e, "feed fetch failed");
                FeedState::Error {
                    retryable: e.is_retryable(),
                    reason: e.to_string(),
                }
            }
        };
        self.finish(generation, location, next)
    }

    fn begin(&self) -> u64 {
        let generation = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.state = FeedState::Loading;
            inner.generation
        };
        self.announce(generation, &FeedState::Loading);
        generation
    }

    fn finish(&self, generation: u64, location: Coordinate, next: FeedState) -> bool {
        {
            let mut inner = self.lock();
            if inner.generation != generation {
                tracing::debug!(
                    generation,
                    current = inner.generation,
                    "dropping superseded feed response"
                );
                return false;
            }
            inner.user_location = Some(location);
            inner.state = next.clone();
        }
        self.announce(generation, &next);
        true
    }

    fn announce(&self, generation: u64, state: &FeedState) {
        let event = FeedStateChangedEvent {
            phase: state.phase(),
            generation,
            count: match state {
                FeedState::Ready { whispers } => Some(whispers.len()),
                _ => None,
            },
            reason: state.error_reason().map(str::to_string),
        };
        self.events.publish(event_names::FEED_STATE_CHANGED, &event);
    }

    // -------------------------------------------------------------------------
    // Submission
    // -------------------------------------------------------------------------

    /// Validates, sends and then refetches so the new whisper shows up.
    pub async fn submit_whisper(&self, text: &str, emotion: Emotion) -> Result<()> {
        self.create_whisper(text, emotion).await?;
        self.refetch().await;
        Ok(())
    }

    async fn create_whisper(&self, text: &str, emotion: Emotion) -> Result<()> {
        if text.trim().is_empty() {
            return Err(DraftError::Empty.into());
        }
        let Some(location) = self.user_location() else {
            return Err(FeedError::Validation(LOCATION_UNAVAILABLE.to_string()));
        };

        let draft = WhisperDraft::new(text, emotion, location)?;
        self.repo.create(&draft).await?;

        self.events.publish(
            event_names::WHISPER_CREATED,
            &WhisperCreatedEvent {
                emotion,
                latitude: location.latitude,
                longitude: location.longitude,
            },
        );
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Compose surface
    // -------------------------------------------------------------------------

    /// Snapshot of the compose surface.
    pub fn compose(&self) -> Compose {
        self.lock().compose.clone()
    }

    /// Opens the compose surface, clearing any stale error.
    pub fn open_compose(&self) {
        let mut inner = self.lock();
        inner.compose.open = true;
        inner.compose.error = None;
    }

    /// Closing discards the draft.
    pub fn close_compose(&self) {
        self.lock().compose.reset();
    }

    /// Replaces the draft text. Length is only enforced on submit.
    pub fn update_draft(&self, text: impl Into<String>) {
        self.lock().compose.text = text.into();
    }

    /// Picks the draft's emotion.
    pub fn select_draft_emotion(&self, emotion: Emotion) {
        self.lock().compose.emotion = emotion;
    }

    /// Submits the compose draft. On success the surface closes and the feed
    /// is refetched; on failure the draft stays and the error is kept for
    /// inline display.
    pub async fn submit_draft(&self) -> Result<()> {
        let (text, emotion) = {
            let mut inner = self.lock();
            inner.compose.submitting = true;
            inner.compose.error = None;
            (inner.compose.text.clone(), inner.compose.emotion)
        };

        match self.create_whisper(&text, emotion).await {
            Ok(()) => {
                self.lock().compose.reset();
                self.refetch().await;
                Ok(())
            }
            Err(e) => {
                let mut inner = self.lock();
                inner.compose.submitting = false;
                inner.compose.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("feed state mutex poisoned")
    }
}
