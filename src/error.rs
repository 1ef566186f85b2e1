//! Error types for stap-tasks.

/// Top-level error type for a task run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("Task error: {0}")]
    Task(#[from] TaskError),
}

/// Errors on the host <-> task line channel.
///
/// None of these are recoverable: the host is trusted to speak the protocol,
/// so any of them ends the task.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed JSON line: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("Invalid message format: {0}")]
    InvalidMessage(String),

    #[error("Host closed the channel")]
    Closed,

    #[error("Failed to serialize outbound message: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Task setup and configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidConfig { key: String, message: String },
}

impl TaskError {
    pub fn invalid(key: &str, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for task runs.
pub type Result<T> = std::result::Result<T, Error>;
