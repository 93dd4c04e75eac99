//! In-memory presence service used by the session and driver tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::payload::Payload;
use super::traits::{Connection, Connector};
use crate::error::TransportError;

#[derive(Debug, Default)]
pub struct StubState {
    pub opens: u32,
    pub shutdowns: u32,
    pub pushes: Vec<Payload>,
    /// Number of upcoming `open` calls that fail
    pub failing_opens: u32,
    /// Number of upcoming `push` calls that fail
    pub failing_pushes: u32,
    pub failing_shutdown: bool,
}

#[derive(Clone, Default)]
pub struct StubConnector {
    pub state: Arc<Mutex<StubState>>,
}

impl StubConnector {
    pub fn failing_opens(count: u32) -> Self {
        let stub = Self::default();
        stub.state.lock().unwrap().failing_opens = count;
        stub
    }

    pub fn fail_next_pushes(&self, count: u32) {
        self.state.lock().unwrap().failing_pushes = count;
    }

    pub fn opens(&self) -> u32 {
        self.state.lock().unwrap().opens
    }

    pub fn shutdowns(&self) -> u32 {
        self.state.lock().unwrap().shutdowns
    }

    pub fn pushes(&self) -> Vec<Payload> {
        self.state.lock().unwrap().pushes.clone()
    }
}

pub struct StubConnection {
    state: Arc<Mutex<StubState>>,
}

#[async_trait]
impl Connector for StubConnector {
    type Connection = StubConnection;

    fn name(&self) -> &'static str {
        "Stub"
    }

    async fn open(&self, _app_id: i64) -> Result<StubConnection, TransportError> {
        let mut state = self.state.lock().unwrap();
        state.opens += 1;
        if state.failing_opens > 0 {
            state.failing_opens -= 1;
            return Err(TransportError::Unavailable("connection refused".to_string()));
        }
        Ok(StubConnection {
            state: Arc::clone(&self.state),
        })
    }
}

#[async_trait]
impl Connection for StubConnection {
    async fn push(&mut self, payload: &Payload) -> Result<(), TransportError> {
        let mut state = self.state.lock().unwrap();
        if state.failing_pushes > 0 {
            state.failing_pushes -= 1;
            return Err(TransportError::Push("pipe closed".to_string()));
        }
        state.pushes.push(payload.clone());
        Ok(())
    }

    async fn shutdown(self) -> Result<(), TransportError> {
        let mut state = self.state.lock().unwrap();
        state.shutdowns += 1;
        if state.failing_shutdown {
            return Err(TransportError::Shutdown("already gone".to_string()));
        }
        Ok(())
    }
}
