//! Owns the connection to the presence service and its retry policy

use super::payload::{build_payload, Overrides};
use super::traits::{Connection, Connector};
use crate::error::{PresenceError, TransportError};
use crate::settings::Settings;

/// A single presence session for one Discord application id.
///
/// The session is connected exactly when it holds a connection handle.
/// Transport failures never escape as anything other than a [`PresenceError`].
pub struct PresenceSession<C: Connector> {
    settings: Settings,
    connector: C,
    connection: Option<C::Connection>,
}

impl<C: Connector> PresenceSession<C> {
    /// Create a disconnected session
    pub fn new(settings: Settings, connector: C) -> Self {
        Self {
            settings,
            connector,
            connection: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Connect using the configured retry count
    pub async fn connect_default(&mut self) -> Result<(), PresenceError> {
        self.connect(self.settings.retry_count).await
    }

    /// Try to connect up to `retries` times, sleeping the configured retry
    /// delay between attempts (never after the last one).
    ///
    /// Returns immediately if already connected.
    pub async fn connect(&mut self, retries: u32) -> Result<(), PresenceError> {
        if self.is_connected() {
            tracing::debug!("Already connected to {}", self.connector.name());
            return Ok(());
        }

        tracing::info!(
            "Connecting to {} (client id {})...",
            self.connector.name(),
            self.settings.client_id
        );

        let mut last_error: Option<TransportError> = None;

        for attempt in 1..=retries {
            match self.connector.open(self.settings.client_id).await {
                Ok(connection) => {
                    self.connection = Some(connection);
                    tracing::info!("Connected to {}", self.connector.name());
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Connection attempt {}/{} failed: {}", attempt, retries, e);
                    last_error = Some(e);

                    if attempt < retries {
                        tokio::time::sleep(self.settings.retry_delay()).await;
                    }
                }
            }
        }

        tracing::error!(
            "Failed to connect to {} after {} attempt(s). Make sure {} is running, \
             the client id is correct and your connection is stable",
            self.connector.name(),
            retries,
            self.connector.name()
        );

        Err(PresenceError::RetriesExhausted {
            attempts: retries,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no connection attempts were made".to_string()),
        })
    }

    /// Push the presence built from settings and `overrides`.
    ///
    /// If the session is disconnected this first calls [`connect_default`]
    /// once and returns its error on failure. A failed push drops the
    /// connection; reconnecting is left to the caller.
    ///
    /// [`connect_default`]: Self::connect_default
    pub async fn update(&mut self, overrides: &Overrides) -> Result<(), PresenceError> {
        if !self.is_connected() {
            self.connect_default().await?;
        }

        let payload = build_payload(&self.settings, overrides);

        let result = match self.connection.as_mut() {
            Some(connection) => connection.push(&payload).await,
            None => Err(TransportError::Disconnected("no connection".to_string())),
        };

        match result {
            Ok(()) => {
                tracing::debug!("Presence updated: {:?}", payload);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to update presence: {}", e);
                self.drop_connection().await;
                Err(e.into())
            }
        }
    }

    /// Release the connection. Never fails; errors are only logged.
    pub async fn close(&mut self) {
        let Some(connection) = self.connection.take() else {
            tracing::debug!("Close requested but no connection is open");
            return;
        };

        match connection.shutdown().await {
            Ok(()) => tracing::info!("{} Rich Presence closed successfully", self.connector.name()),
            Err(e) => tracing::warn!("Error while closing {} connection: {}", self.connector.name(), e),
        }
    }

    async fn drop_connection(&mut self) {
        if let Some(connection) = self.connection.take() {
            if let Err(e) = connection.shutdown().await {
                tracing::debug!("Error releasing broken connection: {}", e);
            }
        }
    }
}
