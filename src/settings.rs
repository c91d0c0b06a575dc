use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const SETTINGS_FILE: &str = "settings.json";
const APP_DIR: &str = "plex-presence";

pub const DEFAULT_DISCORD_APP_ID: i64 = 803_556_010_307_616_788;

/// How playback progress is rendered in the presence timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeMode {
    #[default]
    Elapsed,
    Remaining,
    #[serde(other)]
    Hidden,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub time_mode: TimeMode,
    #[serde(default = "default_discord_app_id")]
    pub discord_app_id: i64,
    #[serde(default)]
    pub translations: Option<PathBuf>,
    #[serde(default = "default_retention")]
    pub litterbox_retention: String,
    /// Overrides the platform log directory
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    /// Log filter used when `RUST_LOG` is not set
    #[serde(default)]
    pub log_level: Option<String>,
}

fn default_discord_app_id() -> i64 {
    DEFAULT_DISCORD_APP_ID
}

fn default_retention() -> String {
    "1h".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            time_mode: TimeMode::Elapsed,
            discord_app_id: DEFAULT_DISCORD_APP_ID,
            translations: None,
            litterbox_retention: default_retention(),
            log_dir: None,
            log_level: None,
        }
    }
}

pub fn get_settings_path() -> Result<PathBuf, String> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| "Failed to get config directory".to_string())?
        .join(APP_DIR);

    fs::create_dir_all(&config_dir)
        .map_err(|e| format!("Failed to create config directory: {}", e))?;

    Ok(config_dir.join(SETTINGS_FILE))
}

pub fn load_settings() -> Result<AppSettings, String> {
    let path = get_settings_path()?;
    load_settings_from(&path)
}

pub fn load_settings_from(path: &std::path::Path) -> Result<AppSettings, String> {
    tracing::debug!("Loading settings");

    if !path.exists() {
        return Ok(AppSettings::default());
    }

    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read settings file, using defaults: {}", e);
            return Ok(AppSettings::default());
        }
    };

    if contents.trim().is_empty() {
        tracing::warn!("Settings file is empty, using defaults");
        return Ok(AppSettings::default());
    }

    match serde_json::from_str(&contents) {
        Ok(settings) => Ok(settings),
        Err(e) => {
            tracing::warn!("Failed to parse settings file, using defaults: {}", e);
            Ok(AppSettings::default())
        }
    }
}

pub fn save_settings(settings: &AppSettings) -> Result<(), String> {
    let path = get_settings_path()?;
    save_settings_to(&path, settings)
}

pub fn save_settings_to(path: &std::path::Path, settings: &AppSettings) -> Result<(), String> {
    tracing::debug!("Saving settings");

    let contents = serde_json::to_string_pretty(settings)
        .map_err(|e| format!("Failed to serialize settings: {}", e))?;

    fs::write(path, contents).map_err(|e| format!("Failed to write settings file: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("plex-presence-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = load_settings_from(&temp_path("missing.json")).unwrap();
        assert_eq!(settings.time_mode, TimeMode::Elapsed);
        assert_eq!(settings.discord_app_id, DEFAULT_DISCORD_APP_ID);
    }

    #[test]
    fn test_round_trip_and_unknown_time_mode() {
        let path = temp_path("settings.json");
        let settings = AppSettings {
            time_mode: TimeMode::Remaining,
            ..AppSettings::default()
        };
        save_settings_to(&path, &settings).unwrap();
        assert_eq!(load_settings_from(&path).unwrap().time_mode, TimeMode::Remaining);

        fs::write(&path, r#"{ "time_mode": "countdown" }"#).unwrap();
        let loaded = load_settings_from(&path).unwrap();
        assert_eq!(loaded.time_mode, TimeMode::Hidden);
        assert_eq!(loaded.litterbox_retention, "1h");
        assert!(loaded.log_dir.is_none());

        fs::write(&path, r#"{ "log_dir": "/tmp/pp-logs", "log_level": "debug" }"#).unwrap();
        let loaded = load_settings_from(&path).unwrap();
        assert_eq!(loaded.log_dir, Some(PathBuf::from("/tmp/pp-logs")));
        assert_eq!(loaded.log_level.as_deref(), Some("debug"));

        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_settings_from(&path).unwrap().time_mode, TimeMode::Elapsed);

        let _ = fs::remove_file(&path);
    }
}
