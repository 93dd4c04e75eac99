//! Discord Rich Presence transport using discord-sdk

use std::time::{Duration, UNIX_EPOCH};

use async_trait::async_trait;
use discord_sdk::{
    activity::{ActivityBuilder, Assets, Button},
    wheel::{UserState, Wheel},
    Discord, Subscriptions,
};

use crate::error::TransportError;
use crate::presence::{Connection, Connector, Payload};

/// Opens Discord IPC connections, waiting for the handshake to complete
pub struct DiscordConnector {
    handshake_timeout: Duration,
}

impl DiscordConnector {
    pub fn new(handshake_timeout: Duration) -> Self {
        Self { handshake_timeout }
    }
}

/// A connected Discord client. The wheel is kept so the handler's state
/// channels stay open for as long as the connection lives.
pub struct DiscordConnection {
    discord: Discord,
    _wheel: Wheel,
    release_timeout: Duration,
}

#[async_trait]
impl Connector for DiscordConnector {
    type Connection = DiscordConnection;

    fn name(&self) -> &'static str {
        "Discord"
    }

    async fn open(&self, app_id: i64) -> Result<DiscordConnection, TransportError> {
        let (wheel, handler) = Wheel::new(Box::new(|err| {
            tracing::warn!("Discord error: {:?}", err);
        }));

        let mut user_spoke = wheel.user();

        let discord = Discord::new(app_id, Subscriptions::ACTIVITY, Box::new(handler))
            .map_err(|e| TransportError::Unavailable(format!("{:?}", e)))?;

        tracing::debug!("Waiting for Discord handshake...");

        let handshake = tokio::time::timeout(self.handshake_timeout, async {
            if user_spoke.0.changed().await.is_err() {
                Err(TransportError::Disconnected(
                    "Discord connection closed".to_string(),
                ))
            } else {
                match &*user_spoke.0.borrow() {
                    UserState::Connected(user) => Ok(user.clone()),
                    UserState::Disconnected(err) => {
                        Err(TransportError::Disconnected(format!("{:?}", err)))
                    }
                }
            }
        })
        .await;

        let user = match handshake {
            Ok(Ok(user)) => user,
            Ok(Err(e)) => {
                discord.disconnect().await;
                return Err(e);
            }
            Err(_) => {
                // stop discord-sdk from reconnecting in the background
                discord.disconnect().await;
                return Err(TransportError::HandshakeTimeout(
                    self.handshake_timeout.as_secs(),
                ));
            }
        };

        tracing::info!("Discord Rich Presence connected as {}", user.username);

        Ok(DiscordConnection {
            discord,
            _wheel: wheel,
            release_timeout: self.handshake_timeout,
        })
    }
}

fn activity_from_payload(payload: &Payload) -> ActivityBuilder {
    let mut activity = ActivityBuilder::new();

    if let Some(state) = &payload.state {
        activity = activity.state(state.as_str());
    }

    if let Some(details) = &payload.details {
        activity = activity.details(details.as_str());
    }

    if payload.large_image.is_some() || payload.small_image.is_some() {
        let mut assets = Assets::default();
        if let Some(key) = &payload.large_image {
            assets = assets.large(key.as_str(), payload.large_text.as_deref());
        }
        if let Some(key) = &payload.small_image {
            assets = assets.small(key.as_str(), payload.small_text.as_deref());
        }
        activity = activity.assets(assets);
    }

    for button in payload.buttons.iter().flatten() {
        activity = activity.button(Button {
            label: button.label.clone(),
            url: button.url.clone(),
        });
    }

    if let Some(start) = payload.start {
        let start = UNIX_EPOCH + Duration::from_secs(start.max(0) as u64);
        activity = activity.start_timestamp(start);
    }

    activity
}

#[async_trait]
impl Connection for DiscordConnection {
    async fn push(&mut self, payload: &Payload) -> Result<(), TransportError> {
        self.discord
            .update_activity(activity_from_payload(payload))
            .await
            .map(|_| ())
            .map_err(|e| TransportError::Push(format!("{:?}", e)))
    }

    async fn shutdown(self) -> Result<(), TransportError> {
        let cleared =
            match tokio::time::timeout(self.release_timeout, self.discord.clear_activity()).await {
                Ok(Ok(_)) => Ok(()),
                Ok(Err(e)) => Err(TransportError::Shutdown(format!("{:?}", e))),
                Err(_) => Err(TransportError::Shutdown(
                    "timed out clearing activity".to_string(),
                )),
            };

        self.discord.disconnect().await;
        tracing::debug!("Discord connection released");

        cleared
    }
}
