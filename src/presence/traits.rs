use chrono::{DateTime, Utc};

use crate::error::PresenceError;

/// Timestamp range rendered as a progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamps {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceButton {
    pub label: String,
    pub url: String,
}

/// Everything pushed to the presence service in one update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresencePayload {
    /// Upper text line
    pub details: Option<String>,
    /// Lower text line
    pub state: Option<String>,
    pub large_image: String,
    pub large_text: String,
    pub small_image: Option<String>,
    pub small_text: Option<String>,
    pub timestamps: Option<Timestamps>,
    pub buttons: Vec<PresenceButton>,
}

/// An open connection to a presence service
pub trait PresenceClient {
    /// Whether the service still considers this connection logged in
    fn is_connected(&self) -> bool;

    fn set_activity(&mut self, payload: &PresencePayload) -> Result<(), PresenceError>;

    fn disconnect(self);
}

/// Opens connections to a presence service (Discord, etc.)
pub trait PresenceConnector {
    type Client: PresenceClient;

    /// Returns the name of this presence service (for logging)
    fn name(&self) -> &'static str;

    fn connect(&mut self) -> Result<Self::Client, PresenceError>;
}
