//! Console + rolling file logging, configured from `AppSettings`

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::settings::AppSettings;

const LOG_FILE_PREFIX: &str = "plex-presence.log";
const DEFAULT_FILTER: &str = "info,hyper=warn,reqwest=warn";
const RETENTION: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// `RUST_LOG` wins over the configured level, which wins over the default
fn filter_directives(settings: &AppSettings, env: Option<String>) -> String {
    env.filter(|v| !v.trim().is_empty())
        .or_else(|| settings.log_level.clone())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

fn log_directory(settings: &AppSettings) -> PathBuf {
    settings.log_dir.clone().unwrap_or_else(|| {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("plex-presence")
            .join("logs")
    })
}

pub fn init_logging(settings: &AppSettings) -> WorkerGuard {
    let log_dir = log_directory(settings);
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
    }

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX));

    let directives = filter_directives(settings, std::env::var("RUST_LOG").ok());
    let env_filter = EnvFilter::try_new(&directives).unwrap_or_else(|e| {
        eprintln!("Warning: Invalid log filter {:?}: {}", directives, e);
        EnvFilter::new(DEFAULT_FILTER)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .init();

    tracing::info!(
        "plex-presence {} logging to {}",
        env!("CARGO_PKG_VERSION"),
        log_dir.display()
    );

    if let Some(cutoff) = SystemTime::now().checked_sub(RETENTION) {
        for path in expired_logs(&log_dir, cutoff) {
            match std::fs::remove_file(&path) {
                Ok(()) => tracing::debug!("Removed old log file: {:?}", path),
                Err(e) => tracing::warn!("Failed to remove old log file {:?}: {}", path, e),
            }
        }
    }

    guard
}

/// Rotated log files last modified before `cutoff`
fn expired_logs(log_dir: &Path, cutoff: SystemTime) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(log_dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Failed to read log directory for cleanup: {}", e);
            return Vec::new();
        }
    };

    entries
        .flatten()
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(LOG_FILE_PREFIX) && name != LOG_FILE_PREFIX)
        })
        .filter(|entry| {
            entry
                .metadata()
                .and_then(|m| m.modified())
                .is_ok_and(|modified| modified < cutoff)
        })
        .map(|entry| entry.path())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_precedence() {
        let mut settings = AppSettings::default();
        assert_eq!(filter_directives(&settings, None), DEFAULT_FILTER);

        settings.log_level = Some("debug".to_string());
        assert_eq!(filter_directives(&settings, None), "debug");
        assert_eq!(filter_directives(&settings, Some(String::new())), "debug");
        assert_eq!(
            filter_directives(&settings, Some("plex_presence_lib=trace".to_string())),
            "plex_presence_lib=trace"
        );
    }

    #[test]
    fn test_configured_log_directory() {
        let settings = AppSettings {
            log_dir: Some(PathBuf::from("/var/log/plex-presence")),
            ..AppSettings::default()
        };
        assert_eq!(log_directory(&settings), PathBuf::from("/var/log/plex-presence"));
        assert!(log_directory(&AppSettings::default()).ends_with("plex-presence/logs"));
    }

    #[test]
    fn test_only_rotated_files_expire() {
        let dir = std::env::temp_dir().join(format!("plex-presence-logs-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for name in [LOG_FILE_PREFIX, "plex-presence.log.2020-01-01", "notes.txt"] {
            std::fs::write(dir.join(name), "x").unwrap();
        }

        let future = SystemTime::now() + Duration::from_secs(60);
        let expired = expired_logs(&dir, future);
        assert_eq!(expired, vec![dir.join("plex-presence.log.2020-01-01")]);
        assert!(expired_logs(&dir, SystemTime::UNIX_EPOCH).is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
