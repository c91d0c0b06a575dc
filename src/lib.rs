mod detector;
mod engine;
mod error;
mod formatter;
mod i18n;
mod logging;
mod presence;
mod session;
mod settings;
mod state;
mod thumbnail;
mod timestamp;

use std::io::BufRead;

pub use detector::{detect, Alterations, Detection};
pub use engine::{PresenceEngine, SyncOutcome};
pub use error::{PresenceError, ThumbnailError};
pub use formatter::{format as format_presence, playback_indicator, track_details_url, Indicator};
pub use i18n::{Localize, MessageId, Translations};
pub use logging::init_logging;
pub use presence::{
    DiscordClient, DiscordConnector, PresenceButton, PresenceClient, PresenceConnector,
    PresenceManager, PresencePayload, Timestamps,
};
pub use session::{
    Director, MediaItem, MediaType, PlayState, PlaybackSession, ServerConnection, SessionSnapshot,
};
pub use settings::{load_settings, save_settings, AppSettings, TimeMode};
pub use state::PresenceState;
pub use thumbnail::{
    ImageHost, ImageSource, Litterbox, PlexTranscoder, ThumbnailCache, ThumbnailResolver,
    FALLBACK_IMAGE,
};
pub use timestamp::{compute_anchor, Anchor, DRIFT_THRESHOLD_SECS};

fn load_translations(settings: &AppSettings) -> Translations {
    match &settings.translations {
        Some(path) => Translations::load(path).unwrap_or_else(|e| {
            tracing::warn!("{}, using built-in strings", e);
            Translations::default()
        }),
        None => Translations::default(),
    }
}

/// Feed snapshots piped in on stdin (one JSON object per line) into the engine
/// until the input closes.
pub fn run() -> Result<(), String> {
    let settings = load_settings()?;
    let _guard = init_logging(&settings);
    tracing::info!("Time display mode: {:?}", settings.time_mode);

    let connector = DiscordConnector::new(settings.discord_app_id);
    let resolver = ThumbnailResolver::new(
        PlexTranscoder::new()?,
        Litterbox::new(settings.litterbox_retention.as_str())?,
    );
    let mut engine = PresenceEngine::new(
        connector,
        resolver,
        load_translations(&settings),
        settings.time_mode,
    );
    let mut state = PresenceState::new();

    for line in std::io::stdin().lock().lines() {
        let line = line.map_err(|e| format!("Failed to read snapshot: {}", e))?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<SessionSnapshot>(&line) {
            Ok(snapshot) => {
                let outcome = engine.sync(&mut state, &snapshot);
                tracing::debug!("Sync outcome: {:?}", outcome);
            }
            Err(e) => tracing::warn!("Skipping malformed snapshot: {}", e),
        }
    }

    tracing::info!("Snapshot input closed, shutting down");
    engine.shutdown();
    Ok(())
}
