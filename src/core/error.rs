//! Error types for the logger system

use super::log_level::LogLevel;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Level was already present in the enabled set
    #[error("Log level already enabled: {level}")]
    LevelAlreadyEnabled { level: LogLevel },

    /// Level was not present in the enabled set
    #[error("Log level not enabled: {level}")]
    LevelNotEnabled { level: LogLevel },

    /// Name does not match any log level
    #[error("Invalid log level: '{name}'")]
    UnknownLevel { name: String },

    /// A backend with the same name is already registered
    #[error("Backend with that name already exists: {name}")]
    BackendAlreadyRegistered { name: String },

    /// No backend is registered under the name
    #[error("Backend with that name does not exist: {name}")]
    BackendNotFound { name: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Dispatcher already stopped
    #[error("Logger already stopped")]
    LoggerStopped,

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Batch could not be handed to its destination
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an unknown level error
    pub fn unknown_level(name: impl Into<String>) -> Self {
        LoggerError::UnknownLevel { name: name.into() }
    }

    /// Create a duplicate backend error
    pub fn backend_exists(name: impl Into<String>) -> Self {
        LoggerError::BackendAlreadyRegistered { name: name.into() }
    }

    /// Create a missing backend error
    pub fn backend_not_found(name: impl Into<String>) -> Self {
        LoggerError::BackendNotFound { name: name.into() }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}

/// Failure of a single delivery attempt.
///
/// Delivery is attempted exactly once per batch; whoever receives this error
/// decides what to do with it. The dispatcher reports it and drops the batch.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// Batch could not be encoded
    #[error("unable to encode log batch: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The request never produced a response
    #[error("unable to POST to {target}: {message}")]
    Transport { target: String, message: String },

    /// The destination answered with a non-success status
    #[error("POST to {target} returned status {status}")]
    Status { target: String, status: u16 },
}

impl DeliveryError {
    /// Create a transport error
    pub fn transport(target: impl Into<String>, message: impl Into<String>) -> Self {
        DeliveryError::Transport {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create a status error
    pub fn status(target: impl Into<String>, status: u16) -> Self {
        DeliveryError::Status {
            target: target.into(),
            status,
        }
    }
}
