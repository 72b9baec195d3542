//! Relay-specific error types

use shared::SharedError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Network request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("Cache storage error on bucket {bucket}: {message}")]
    CacheStorage { bucket: String, message: String },

    #[error("Invalid request: {details}")]
    InvalidRequest { details: String },

    #[error("Monitoring poll failed: {message}")]
    PollFailed { message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server startup error: {0}")]
    ServerStartup(String),

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),
}

impl RelayError {
    pub fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn cache(bucket: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CacheStorage {
            bucket: bucket.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn invalid_request(details: impl Into<String>) -> Self {
        Self::InvalidRequest { details: details.into() }
    }

    /// True when no response could be obtained at all
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

pub type RelayResult<T> = Result<T, RelayError>;
