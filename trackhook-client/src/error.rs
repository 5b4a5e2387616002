//! Tracking API client error types.

use thiserror::Error;

/// Result type for tracking API operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Tracking API client errors.
///
/// A non-2xx answer from the provider is not an error; it is returned as an
/// [`ApiResponse`](crate::ApiResponse) with its status code.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request could not be sent or the response could not be read.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// URL parsing error.
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Client misconfiguration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Check if this error is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// Check if this error is a connection failure.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_connect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ClientError::InvalidUrl("not a base".to_string());
        assert_eq!(err.to_string(), "Invalid URL: not a base");
        assert!(!err.is_timeout());

        let err: ClientError = url::Url::parse("::").unwrap_err().into();
        assert!(matches!(err, ClientError::UrlParse(_)));
    }
}
