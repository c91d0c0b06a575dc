//! Owns the lazily opened presence connection

use super::traits::{PresenceClient, PresenceConnector, PresencePayload};

/// Publishes payloads, connecting on first use and dropping the connection on failure
pub struct PresenceManager<C: PresenceConnector> {
    connector: C,
    client: Option<C::Client>,
}

impl<C: PresenceConnector> PresenceManager<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            client: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    fn ensure_connected(&mut self) -> Option<&mut C::Client> {
        if self.client.as_ref().is_some_and(|c| !c.is_connected()) {
            tracing::debug!("{} connection is no longer logged in", self.connector.name());
            self.discard_client();
        }

        if self.client.is_none() {
            match self.connector.connect() {
                Ok(client) => {
                    tracing::info!("Connected to {}", self.connector.name());
                    self.client = Some(client);
                }
                Err(e) => {
                    tracing::error!("Failed to connect to {}: {}", self.connector.name(), e);
                    return None;
                }
            }
        }

        self.client.as_mut()
    }

    /// Push a payload. Returns whether it was accepted.
    pub fn publish(&mut self, payload: &PresencePayload) -> bool {
        let name = self.connector.name();
        let Some(client) = self.ensure_connected() else {
            return false;
        };

        match client.set_activity(payload) {
            Ok(()) => {
                tracing::info!("{} activity set", name);
                true
            }
            Err(e) => {
                tracing::error!("An error occurred when setting the activity in {}: {}", name, e);
                self.discard_client();
                false
            }
        }
    }

    /// Tear down a connection that is no longer usable
    fn discard_client(&mut self) {
        if let Some(client) = self.client.take() {
            client.disconnect();
        }
    }

    pub fn disconnect(&mut self) {
        if self.client.is_some() {
            tracing::info!("Closing connection to {}", self.connector.name());
            self.discard_client();
        }
    }
}
