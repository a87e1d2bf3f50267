//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Remote client could not be acquired
    #[error("Failed to acquire remote logging client for '{identity}': {message}")]
    Acquisition { identity: String, message: String },

    /// Remote client failed to release its resources
    #[error("Failed to release remote logging client: {0}")]
    Release(String),

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },
}

impl LoggerError {
    /// Create an acquisition error for a backend identity
    pub fn acquisition(identity: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Acquisition {
            identity: identity.into(),
            message: message.into(),
        }
    }

    /// Create a release error
    pub fn release<S: Into<String>>(msg: S) -> Self {
        LoggerError::Release(msg.into())
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Whether this error came from acquiring the remote client
    pub fn is_acquisition(&self) -> bool {
        matches!(self, LoggerError::Acquisition { .. })
    }
}
