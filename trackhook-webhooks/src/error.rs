//! Error types for webhook operations

use http::StatusCode;
use thiserror::Error;

/// Errors that can occur while receiving or sending webhooks
#[derive(Error, Debug)]
pub enum WebhookError {
    /// Wrong method, empty body or oversized body
    #[error("Invalid request: {0}")]
    MalformedRequest(String),

    /// Signature header absent or empty
    #[error("Signature missing from request")]
    SignatureMissing,

    /// Signature present but does not match the body
    #[error("Signature verification failed")]
    SignatureInvalid,

    /// Body is not valid JSON
    #[error("Invalid JSON payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// Body decoded to JSON `null`
    #[error("No payload received")]
    EmptyPayload,

    /// Outbound payload could not be encoded
    #[error("Failed to serialize payload: {0}")]
    SerializationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Outbound HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WebhookError {
    /// HTTP status the endpoint answers with for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedRequest(_) | Self::MalformedPayload(_) | Self::EmptyPayload => {
                StatusCode::BAD_REQUEST
            }
            Self::SignatureMissing | Self::SignatureInvalid => StatusCode::UNAUTHORIZED,
            Self::SerializationError(_)
            | Self::ConfigError(_)
            | Self::HttpError(_)
            | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message placed in the `{"error": ...}` response body.
    ///
    /// Never includes internal details.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MalformedRequest(_) => "Invalid request",
            Self::SignatureMissing => "Missing signature header",
            Self::SignatureInvalid => "Invalid signature",
            Self::MalformedPayload(_) => "Invalid JSON",
            Self::EmptyPayload => "No payload received",
            Self::SerializationError(_)
            | Self::ConfigError(_)
            | Self::HttpError(_)
            | Self::Io(_) => "Internal error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            WebhookError::MalformedRequest("empty body".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebhookError::SignatureMissing.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            WebhookError::SignatureInvalid.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(WebhookError::EmptyPayload.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            WebhookError::SerializationError("key must be a string".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_public_messages() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();

        assert_eq!(
            WebhookError::MalformedPayload(json_error).public_message(),
            "Invalid JSON"
        );
        assert_eq!(
            WebhookError::SignatureMissing.public_message(),
            "Missing signature header"
        );
        assert_eq!(
            WebhookError::ConfigError("secret".into()).public_message(),
            "Internal error"
        );
    }
}
