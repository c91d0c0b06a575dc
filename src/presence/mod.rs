mod discord;
mod manager;
mod traits;

pub use discord::{DiscordClient, DiscordConnector};
pub use manager::PresenceManager;
pub use traits::{PresenceButton, PresenceClient, PresenceConnector, PresencePayload, Timestamps};

#[cfg(test)]
pub(crate) use manager::fakes;
