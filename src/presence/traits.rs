use async_trait::async_trait;

use super::payload::Payload;
use crate::error::TransportError;

/// Opens connections to the presence service (Discord, or a stub in tests)
#[async_trait]
pub trait Connector: Send + Sync {
    type Connection: Connection;

    /// Returns the name of this presence service (for logging)
    fn name(&self) -> &'static str;

    /// Establish a connection for the given application id
    async fn open(&self, app_id: i64) -> Result<Self::Connection, TransportError>;
}

/// A live connection handle
#[async_trait]
pub trait Connection: Send {
    /// Replace the displayed activity with `payload`
    async fn push(&mut self, payload: &Payload) -> Result<(), TransportError>;

    /// Clear the activity and release the connection
    async fn shutdown(self) -> Result<(), TransportError>;
}
