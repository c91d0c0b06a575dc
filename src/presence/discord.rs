//! Discord Rich Presence integration using discord-sdk

use std::time::{Duration, SystemTime};

use discord_sdk::{
    activity::{ActivityBuilder, Assets, Button},
    wheel::{UserSpoke, UserState, Wheel},
    Discord, Subscriptions,
};
use tokio::runtime::Runtime;

use super::traits::{PresenceClient, PresenceConnector, PresencePayload};
use crate::error::PresenceError;

/// Timeout for waiting for Discord handshake
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Bound on the goodbye handshake; the SDK ignores shutdown while it is
/// still retrying its IPC connection
const DISCONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Opens Discord IPC connections for one application ID.
///
/// discord-sdk is async and spawns its I/O task on the current runtime. Each
/// connection gets a runtime of its own so that discarding the connection
/// also stops that task.
pub struct DiscordConnector {
    app_id: i64,
}

impl DiscordConnector {
    pub fn new(app_id: i64) -> Self {
        Self { app_id }
    }
}

fn build_runtime() -> Result<Runtime, PresenceError> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("discord-ipc")
        .enable_all()
        .build()
        .map_err(|e| PresenceError::Unavailable(format!("Failed to start runtime: {}", e)))
}

impl PresenceConnector for DiscordConnector {
    type Client = DiscordClient;

    fn name(&self) -> &'static str {
        "Discord"
    }

    fn connect(&mut self) -> Result<DiscordClient, PresenceError> {
        let app_id = self.app_id;
        let runtime = build_runtime()?;

        let handshake = runtime.block_on(async move {
            let (wheel, handler) = Wheel::new(Box::new(|err| {
                tracing::warn!("Discord error: {:?}", err);
            }));

            let mut user_spoke = wheel.user();

            let discord = Discord::new(app_id, Subscriptions::ACTIVITY, Box::new(handler))
                .map_err(|e| PresenceError::Unavailable(format!("{:?}", e)))?;

            tracing::info!("Discord connecting...");

            let user = tokio::time::timeout(HANDSHAKE_TIMEOUT, async {
                if user_spoke.0.changed().await.is_err() {
                    Err(PresenceError::Handshake("Discord connection closed".to_string()))
                } else {
                    match &*user_spoke.0.borrow() {
                        UserState::Connected(user) => Ok(user.clone()),
                        UserState::Disconnected(err) => {
                            Err(PresenceError::Handshake(format!("{:?}", err)))
                        }
                    }
                }
            })
            .await
            .map_err(|_| PresenceError::HandshakeTimeout)??;

            tracing::info!(
                "Discord Rich Presence connected as {}#{}",
                user.username,
                user.discriminator.unwrap_or(0)
            );

            Ok::<_, PresenceError>((discord, wheel, user_spoke))
        });

        match handshake {
            Ok((discord, wheel, user)) => Ok(DiscordClient {
                discord,
                _wheel: wheel,
                user,
                runtime,
            }),
            Err(e) => {
                // kills the SDK's reconnect loop along with the runtime
                runtime.shutdown_background();
                Err(e)
            }
        }
    }
}

pub struct DiscordClient {
    discord: Discord,
    /// Keeps the event spokes alive for the lifetime of the connection
    _wheel: Wheel,
    user: UserSpoke,
    runtime: Runtime,
}

fn build_activity(payload: &PresencePayload) -> ActivityBuilder {
    let mut assets = Assets::default().large(
        payload.large_image.as_str(),
        Some(payload.large_text.as_str()),
    );
    if let Some(small_image) = &payload.small_image {
        assets = assets.small(small_image.as_str(), payload.small_text.as_deref());
    }

    let mut activity = ActivityBuilder::new().assets(assets);

    if let Some(details) = &payload.details {
        activity = activity.details(details.as_str());
    }
    if let Some(state) = &payload.state {
        activity = activity.state(state.as_str());
    }
    if let Some(timestamps) = payload.timestamps {
        if let Some(start) = timestamps.start {
            activity = activity.start_timestamp(SystemTime::from(start));
        }
        if let Some(end) = timestamps.end {
            activity = activity.end_timestamp(SystemTime::from(end));
        }
    }
    for button in &payload.buttons {
        activity = activity.button(Button {
            label: button.label.clone(),
            url: button.url.clone(),
        });
    }

    activity
}

impl PresenceClient for DiscordClient {
    fn is_connected(&self) -> bool {
        matches!(&*self.user.0.borrow(), UserState::Connected(_))
    }

    fn set_activity(&mut self, payload: &PresencePayload) -> Result<(), PresenceError> {
        let activity = build_activity(payload);
        self.runtime
            .block_on(self.discord.update_activity(activity))
            .map(|_| ())
            .map_err(|e| PresenceError::Activity(format!("{:?}", e)))
    }

    fn disconnect(self) {
        let Self {
            discord, runtime, ..
        } = self;
        let closed = runtime.block_on(async move {
            tokio::time::timeout(DISCONNECT_TIMEOUT, discord.disconnect()).await
        });
        if closed.is_err() {
            tracing::debug!("Discord did not acknowledge disconnect in time");
        }
        runtime.shutdown_background();
        tracing::info!("Discord Rich Presence disconnected");
    }
}
