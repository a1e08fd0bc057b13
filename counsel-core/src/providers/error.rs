//! Provider error types and handling

use thiserror::Error;

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur when invoking a model through a gateway
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network or connection error
    #[error("network error: {0}")]
    Network(String),

    /// Authentication failed or credential missing
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Rate limit exceeded
    #[error("rate limit exceeded: {0}")]
    RateLimit(String),

    /// Upstream service returned an error status
    #[error("upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// Request timed out
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Response could not be parsed into text
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Gateway misconfiguration
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout(120)
        } else if err.is_connect() {
            ProviderError::Network(format!("connection failed: {}", err))
        } else if err.is_status() {
            match err.status().map(|s| s.as_u16()) {
                Some(401) | Some(403) => ProviderError::Authentication(err.to_string()),
                Some(429) => ProviderError::RateLimit(err.to_string()),
                Some(status) => ProviderError::Upstream {
                    status,
                    message: err.to_string(),
                },
                None => ProviderError::Network(err.to_string()),
            }
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Parse(err.to_string())
    }
}
