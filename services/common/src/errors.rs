//! Error types for each collaborator boundary

use thiserror::Error;

/// Price feed failures (network, HTTP status, malformed payload)
#[derive(Debug, Error)]
pub enum FeedError {
    /// Upstream answered with a non-success status
    #[error("Price feed returned HTTP {status}")]
    Http {
        /// HTTP status code
        status: u16,
    },

    /// Request could not be sent or the body could not be read
    #[error("Price feed transport error: {0}")]
    Transport(String),

    /// Payload did not have the expected shape
    #[error("Malformed price feed payload: {0}")]
    Malformed(String),

    /// Call exceeded its deadline
    #[error("Price feed timeout after {0}s")]
    Timeout(u64),
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Http {
                status: status.as_u16(),
            }
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Advisory oracle failures. Never escapes the advisor boundary.
#[derive(Debug, Error)]
pub enum AdvisoryError {
    /// Oracle answered with a non-success status
    #[error("Advisory oracle returned HTTP {status}")]
    Http {
        /// HTTP status code
        status: u16,
    },

    /// Request could not be sent or credentials are missing
    #[error("Advisory transport error: {0}")]
    Transport(String),

    /// Response body could not be decoded
    #[error("Malformed advisory response: {0}")]
    Malformed(String),

    /// Response decoded but violates the recommendation schema
    #[error("Advisory schema violation: {0}")]
    Schema(String),

    /// Call exceeded its deadline
    #[error("Advisory timeout after {0}s")]
    Timeout(u64),
}

impl From<reqwest::Error> for AdvisoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Http {
                status: status.as_u16(),
            }
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Persistence gateway write/read failures
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Filesystem failure
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record could not be encoded or decoded
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend refused the write
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Runtime configuration store failures
#[derive(Debug, Error)]
pub enum ConfigStoreError {
    /// Filesystem failure
    #[error("Config store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document could not be encoded or decoded
    #[error("Config store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
