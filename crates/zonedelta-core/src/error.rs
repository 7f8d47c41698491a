//! Error types for the change processor
//!
//! This module defines the *infrastructure* error channel. Anticipated
//! change-level outcomes (a DNS refusal, a validation mismatch) are never
//! represented here; they travel as values (`DnsError` inside the connector
//! result, `ProcessingStatus::Failure` out of the
//! classifier) and end up persisted on the change itself. Only faults the
//! handler cannot convert into a terminal change status (storage failures,
//! transport exceptions, bad configuration) use this enum and unwind to the
//! caller, leaving the change `Pending` for redelivery.

use thiserror::Error;

/// Result type alias for processor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Infrastructure error for the change processor
#[derive(Error, Debug)]
pub enum Error {
    /// DNS connector transport errors (beyond the DNS-level result channel)
    #[error("connector error: {0}")]
    Connector(String),

    /// Repository/store errors
    #[error("store error: {0}")]
    Store(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Network-related errors
    #[error("network error: {0}")]
    Network(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a connector error
    pub fn connector(msg: impl Into<String>) -> Self {
        Self::Connector(msg.into())
    }

    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
