//! Error types for the trackhook CLI.

use std::fmt;
use trackhook_client::ClientError;
use trackhook_config::ConfigError;
use trackhook_webhooks::WebhookError;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types.
#[derive(Debug)]
pub enum CliError {
    /// IO error
    Io(std::io::Error),

    /// Configuration could not be loaded or is incomplete
    Config(ConfigError),

    /// Webhook server or test delivery failure
    Webhook(WebhookError),

    /// Tracking API call failed before a response arrived
    Client(ClientError),

    /// Invalid argument
    InvalidArgument(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::Config(e) => write!(f, "{}", e),
            CliError::Webhook(e) => write!(f, "Webhook error: {}", e),
            CliError::Client(e) => write!(f, "Tracking API error: {}", e),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<WebhookError> for CliError {
    fn from(e: WebhookError) -> Self {
        CliError::Webhook(e)
    }
}

impl From<ClientError> for CliError {
    fn from(e: ClientError) -> Self {
        CliError::Client(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = CliError::InvalidArgument("event type".to_string());
        assert_eq!(err.to_string(), "Invalid argument: event type");

        let err: CliError = ClientError::InvalidUrl("x".to_string()).into();
        assert_eq!(err.to_string(), "Tracking API error: Invalid URL: x");
    }
}
