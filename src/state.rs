use chrono::{DateTime, Utc};

use crate::session::PlayState;
use crate::thumbnail::ThumbnailCache;

/// What was last shown on the presence service.
///
/// Created empty when the poll loop starts and owned by it; every sync call
/// may update it. Not shared between threads.
#[derive(Debug, Clone, Default)]
pub struct PresenceState {
    pub(crate) playing_item: Option<String>,
    pub(crate) play_state: Option<PlayState>,
    pub(crate) last_anchor: Option<DateTime<Utc>>,
    pub(crate) thumbnail: ThumbnailCache,
}

impl PresenceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn playing_item(&self) -> Option<&str> {
        self.playing_item.as_deref()
    }

    pub fn play_state(&self) -> Option<PlayState> {
        self.play_state
    }

    pub fn last_anchor(&self) -> Option<DateTime<Utc>> {
        self.last_anchor
    }

    pub fn thumbnail(&self) -> &ThumbnailCache {
        &self.thumbnail
    }

    /// Drop the published item so the next sync treats it as new
    pub(crate) fn forget_published(&mut self) {
        self.playing_item = None;
    }
}
