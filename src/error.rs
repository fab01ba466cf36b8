//! Error types for update state tracking

use thiserror::Error;

/// Update state error type
#[derive(Debug, Error)]
pub enum UpdateError {
    /// Transport failure or non-success HTTP status
    #[error("network error: {0}")]
    Network(String),

    /// Response body did not have the expected shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Local build configuration is absent
    #[error("build config missing: {0}")]
    ConfigMissing(String),

    /// Metering API rejected the credentials
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Persisted state could not be read or written
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<reqwest::Error> for UpdateError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::MalformedResponse(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for UpdateError {
    fn from(e: serde_json::Error) -> Self {
        Self::MalformedResponse(e.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, UpdateError>;
