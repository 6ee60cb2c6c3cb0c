//! Error types for pubsub-bridge.

use std::time::Duration;
use thiserror::Error;

/// Result type for pubsub-bridge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for pubsub-bridge.
#[derive(Error, Debug)]
pub enum Error {
    /// Settings file could not be opened or read.
    #[error("Failed to read settings file {path}: {source}")]
    ConfigFile {
        /// Path of the settings file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A required setting is absent or empty.
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credential or connection setup failed.
    #[error("Failed to create Pub/Sub client: {0}")]
    ClientInit(String),

    /// Broker rejected the publish or communication failed.
    #[error("Failed to publish message: {0}")]
    Publish(String),

    /// The publish deadline elapsed before acknowledgment.
    #[error("Publish timed out after {0:?}")]
    Timeout(Duration),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tonic::Status> for Error {
    fn from(status: tonic::Status) -> Self {
        Error::Publish(format!("{:?}: {}", status.code(), status.message()))
    }
}
