use std::path::PathBuf;

/// Failure reported by the presence transport (Discord IPC).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Discord not available: {0}")]
    Unavailable(String),

    #[error("Discord disconnected: {0}")]
    Disconnected(String),

    #[error("Discord handshake timed out after {0}s")]
    HandshakeTimeout(u64),

    #[error("failed to update activity: {0}")]
    Push(String),

    #[error("failed to release connection: {0}")]
    Shutdown(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PresenceError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("gave up connecting after {attempts} attempt(s): {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("could not determine config directory")]
    NoConfigDir,

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to create log directory {}: {source}", .path.display())]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to open log file: {0}")]
    Appender(#[from] tracing_appender::rolling::InitError),

    #[error("a global logger is already installed: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}
