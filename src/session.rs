//! Playback session snapshots as reported by the media server

use serde::{Deserialize, Serialize};

/// Kind of media being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Episode,
    Movie,
    Track,
    Photo,
    Clip,
    #[default]
    #[serde(other)]
    Other,
}

/// Playback state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlayState {
    Playing,
    Paused,
    Buffering,
    Stopped,
    #[default]
    #[serde(other)]
    Unknown,
}

impl PlayState {
    pub fn as_str(self) -> &'static str {
        match self {
            PlayState::Playing => "playing",
            PlayState::Paused => "paused",
            PlayState::Buffering => "buffering",
            PlayState::Stopped => "stopped",
            PlayState::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Director {
    pub tag: String,
}

/// Descriptive metadata for the item being played
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaItem {
    #[serde(rename = "type")]
    pub media_type: MediaType,
    /// Stable identity of the item within its server
    pub guid: String,
    pub parent_guid: String,
    pub grandparent_guid: String,
    pub title: String,
    pub parent_title: String,
    pub grandparent_title: String,
    pub original_title: String,
    pub index: u32,
    pub parent_index: u32,
    pub year: i32,
    #[serde(rename = "Director")]
    pub director: Vec<Director>,
    pub thumb: Option<String>,
    pub parent_thumb: Option<String>,
    pub grandparent_thumb: Option<String>,
    /// Total duration in milliseconds
    pub duration: i64,
}

impl MediaItem {
    /// Thumbnail reference shown as the large image for this media type
    pub fn artwork(&self) -> Option<&str> {
        let thumb = match self.media_type {
            MediaType::Episode => self.grandparent_thumb.as_deref(),
            MediaType::Movie => self.thumb.as_deref(),
            MediaType::Track => self.parent_thumb.as_deref(),
            MediaType::Photo | MediaType::Clip | MediaType::Other => None,
        };
        thumb.filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaybackSession {
    pub state: PlayState,
    /// Elapsed offset in milliseconds
    pub view_offset: i64,
}

/// Where to reach the server that owns the session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConnection {
    pub url: String,
    pub token: String,
}

/// One point-in-time description of an active playback session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub media: MediaItem,
    pub session: PlaybackSession,
    #[serde(default)]
    pub server: ServerConnection,
}

impl SessionSnapshot {
    pub fn media_type(&self) -> MediaType {
        self.media.media_type
    }

    pub fn state(&self) -> PlayState {
        self.session.state
    }
}
