//! hush CLI
//!
//! Browse and post whispers without a UI.
//!
//! Usage:
//!     hush feed --emotion joy --lat 41.3874 --lng 2.1686
//!     hush show 42
//!     hush post peace "first snow on the roofs"
//!     hush map --emotion anxiety

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use hush_api::{ApiConfig, HttpWhisperRepository, WhisperRepositoryRef};
use hush_events::EventBus;
use hush_feed::{load_detail, DetailState, FeedController, FeedState, Route, ViewMode};
use hush_geo::{
    describe_distance, format_relative_time, Coordinate, FixedPositionSource, GeoLocator,
    LocatorConfig,
};
use hush_map::{detail_map, MapConfig, MapSyncEngine, MarkerIcon, Popup, RecordingBackend};
use hush_whisper::{Emotion, WhisperId};

/// hush - anonymous whispers from around you
#[derive(Parser)]
#[command(name = "hush")]
#[command(version)]
#[command(about = "Read and leave anonymous, emotion-tagged whispers nearby", long_about = None)]
struct Cli {
    /// Data source base URL (overrides HUSH_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List whispers near a position
    Feed {
        /// Only show one emotion
        #[arg(short, long)]
        emotion: Option<Emotion>,

        #[command(flatten)]
        at: Position,
    },

    /// Show a single whisper
    Show {
        id: WhisperId,

        #[command(flatten)]
        at: Position,
    },

    /// Leave a whisper at a position
    Post {
        emotion: Emotion,

        text: String,

        #[command(flatten)]
        at: Position,
    },

    /// Print the markers a map of the feed would show
    Map {
        #[arg(short, long)]
        emotion: Option<Emotion>,

        #[command(flatten)]
        at: Position,
    },
}

/// Position override. Without it the default location is used.
#[derive(Args, Clone, Copy)]
struct Position {
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    lat: Option<f64>,

    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lng: Option<f64>,
}

impl Position {
    fn locator(self) -> Result<GeoLocator> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => {
                let at = Coordinate::new(lat, lng);
                if !at.is_valid() {
                    bail!("invalid coordinate: {at}");
                }
                Ok(GeoLocator::new(Arc::new(FixedPositionSource(at))))
            }
            _ => Ok(GeoLocator::fallback_only(LocatorConfig::default())),
        }
    }
}

/// Writes every published event to the debug log.
struct LogEventBus;

impl EventBus for LogEventBus {
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        tracing::debug!(topic, %payload, "event");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,hush=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match cli.api_url {
        Some(url) => ApiConfig {
            base_url: ApiConfig::new(url).base_url,
            ..ApiConfig::from_env()
        },
        None => ApiConfig::from_env(),
    };
    tracing::debug!(base_url = %config.base_url, "using data source");
    let repo: WhisperRepositoryRef =
        Arc::new(HttpWhisperRepository::new(config).context("failed to build HTTP client")?);

    match cli.command {
        Commands::Feed { emotion, at } => cmd_feed(repo, at, emotion).await,
        Commands::Show { id, at } => cmd_show(repo, at, id).await,
        Commands::Post { emotion, text, at } => cmd_post(repo, at, emotion, &text).await,
        Commands::Map { emotion, at } => cmd_map(repo, at, emotion).await,
    }
}

async fn load_feed(
    repo: WhisperRepositoryRef,
    at: Position,
    emotion: Option<Emotion>,
) -> Result<FeedController> {
    let feed = FeedController::new(at.locator()?, repo)
        .with_event_bus(Arc::new(LogEventBus));
    feed.set_filter(emotion);
    feed.initialize().await;

    if let FeedState::Error { reason, .. } = feed.state() {
        bail!("could not load whispers: {reason}");
    }
    Ok(feed)
}

async fn cmd_feed(repo: WhisperRepositoryRef, at: Position, emotion: Option<Emotion>) -> Result<()> {
    let feed = load_feed(repo, at, emotion).await?;
    let now = Utc::now();
    let user = feed.user_location();
    let whispers = feed.filtered_whispers();

    let counts = feed.emotion_counts();
    let chips: Vec<String> = Emotion::ALL
        .iter()
        .map(|e| format!("{} {} ({})", e.emoji(), e.label(), counts.count(*e)))
        .collect();
    println!("{}", chips.join("  "));
    println!();

    if whispers.is_empty() {
        println!("No whispers nearby yet.");
        return Ok(());
    }

    for w in &whispers {
        println!(
            "{} {:<10} {:>9}  {:<18} {}",
            w.emotion.emoji(),
            w.emotion.label(),
            format_relative_time(&w.created_at, &now),
            describe_distance(user, w.position),
            Route::WhisperDetail(w.id).path(),
        );
        println!("    \"{}\"", w.text);
    }
    println!();
    println!("{} of {} shown", whispers.len(), counts.total());
    Ok(())
}

async fn cmd_show(repo: WhisperRepositoryRef, at: Position, id: WhisperId) -> Result<()> {
    let user = at.locator()?.resolve().await;

    match load_detail(repo.as_ref(), id, Some(user), Utc::now()).await {
        DetailState::Ready(detail) => {
            let w = &detail.whisper;
            println!("{} {}", w.emotion.emoji(), w.emotion.label());
            println!();
            println!("\"{}\"", w.text);
            println!();
            println!("{}  ({})", detail.full_date, detail.time_ago);
            println!("{}", detail.distance);
            println!("Share: {}", detail.share_text());

            let backend = RecordingBackend::new();
            let mut map = detail_map(
                backend.clone(),
                MapConfig::from_env(),
                w,
                Some(user),
                Utc::now(),
            );
            println!();
            println!("map centered on {}", w.position);
            print_markers(&backend);
            map.dispose();
            Ok(())
        }
        DetailState::NotFound { message } => bail!("{message}"),
        DetailState::Failed { message, .. } => bail!("could not load whisper: {message}"),
    }
}

async fn cmd_post(
    repo: WhisperRepositoryRef,
    at: Position,
    emotion: Emotion,
    text: &str,
) -> Result<()> {
    let feed = FeedController::new(at.locator()?, repo);
    feed.initialize().await;

    feed.submit_whisper(text, emotion)
        .await
        .context("whisper was not posted")?;

    println!("{} Whisper left.", emotion.emoji());
    Ok(())
}

async fn cmd_map(repo: WhisperRepositoryRef, at: Position, emotion: Option<Emotion>) -> Result<()> {
    let feed = load_feed(repo, at, emotion).await?;
    feed.set_view_mode(ViewMode::Map).await;

    let backend = RecordingBackend::new();
    let mut engine = MapSyncEngine::new(backend.clone(), MapConfig::from_env());
    let anchor = feed.user_location().unwrap_or_else(|| LocatorConfig::default().fallback);
    engine.mount(anchor);
    engine.on_marker_activated(|id| println!("-> {}", Route::WhisperDetail(id).path()));

    let stats = engine.reconcile(&feed.filtered_whispers(), feed.user_location());
    println!("map centered on {anchor}");
    println!("{} whisper markers", stats.added);

    print_markers(&backend);

    engine.dispose();
    Ok(())
}

fn print_markers(backend: &RecordingBackend) {
    for (_, marker) in backend.markers() {
        match (&marker.spec.icon, &marker.popup) {
            (MarkerIcon::UserLocation, _) => println!("  📍 {}  you are here", marker.spec.position),
            (MarkerIcon::Emotion { emoji, .. }, Some(Popup::Whisper(popup))) => println!(
                "  {} {}  {} - {}",
                emoji, marker.spec.position, popup.time_ago, popup.excerpt
            ),
            (MarkerIcon::Emotion { emoji, .. }, _) => println!("  {} {}", emoji, marker.spec.position),
        }
    }
}
