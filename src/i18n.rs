//! Localized strings shown in the presence payload

use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageId {
    Paused,
    NowPlaying,
    WatchingPhotos,
    TrackDetails,
}

impl MessageId {
    pub const ALL: [MessageId; 4] = [
        MessageId::Paused,
        MessageId::NowPlaying,
        MessageId::WatchingPhotos,
        MessageId::TrackDetails,
    ];

    pub fn key(self) -> &'static str {
        match self {
            MessageId::Paused => "Paused",
            MessageId::NowPlaying => "NowPlaying",
            MessageId::WatchingPhotos => "WatchingPhotos",
            MessageId::TrackDetails => "TrackDetails",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.key() == key)
    }

    fn default_text(self) -> &'static str {
        match self {
            MessageId::Paused => "Paused",
            MessageId::NowPlaying => "Playing",
            MessageId::WatchingPhotos => "Watching photos",
            MessageId::TrackDetails => "Track details on plex.tv",
        }
    }
}

/// Resolves a message ID to display text
pub trait Localize {
    fn localize(&self, id: MessageId) -> String;
}

/// Translation table with English fallbacks for missing entries
#[derive(Debug, Clone, Default)]
pub struct Translations {
    messages: HashMap<MessageId, String>,
}

impl Translations {
    pub fn from_map(raw: HashMap<String, String>) -> Self {
        let mut messages = HashMap::new();
        for (key, text) in raw {
            match MessageId::from_key(&key) {
                Some(id) => {
                    messages.insert(id, text);
                }
                None => tracing::debug!("Ignoring unknown translation key: {}", key),
            }
        }
        Self { messages }
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        tracing::debug!("Loading translations from {}", path.display());
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read translations file: {}", e))?;
        let raw: HashMap<String, String> = serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse translations file: {}", e))?;
        Ok(Self::from_map(raw))
    }
}

impl Localize for Translations {
    fn localize(&self, id: MessageId) -> String {
        self.messages
            .get(&id)
            .cloned()
            .unwrap_or_else(|| id.default_text().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_english() {
        let translations = Translations::default();
        assert_eq!(translations.localize(MessageId::NowPlaying), "Playing");
        assert_eq!(
            translations.localize(MessageId::TrackDetails),
            "Track details on plex.tv"
        );
    }

    #[test]
    fn test_overrides_and_unknown_keys() {
        let raw = HashMap::from([
            ("Paused".to_string(), "En pause".to_string()),
            ("Bogus".to_string(), "ignored".to_string()),
        ]);
        let translations = Translations::from_map(raw);
        assert_eq!(translations.localize(MessageId::Paused), "En pause");
        assert_eq!(translations.localize(MessageId::WatchingPhotos), "Watching photos");
    }
}
