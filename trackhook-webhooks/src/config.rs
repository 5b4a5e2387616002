//! Configuration for the webhook endpoint and test sender

use std::path::PathBuf;
use std::time::Duration;

/// Configuration for receiving and sending webhooks
#[derive(Clone)]
pub struct WebhookConfig {
    /// Shared secret for `Tracking-Hmac-Sha256`
    pub secret: String,

    /// Accept unsigned deliveries when no secret is configured
    pub insecure: bool,

    /// Directory for event and diagnostic logs; `None` keeps events in memory
    pub log_dir: Option<PathBuf>,

    /// Maximum accepted body size in bytes
    pub max_body_size: usize,

    /// Timeout for outgoing test deliveries
    pub timeout: Duration,

    /// User-Agent header for outgoing requests
    pub user_agent: String,

    /// Whether to verify SSL certificates on outgoing requests
    pub verify_ssl: bool,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            insecure: false,
            log_dir: None,
            max_body_size: 1024 * 1024,
            timeout: Duration::from_secs(10),
            user_agent: format!("trackhook/{}", env!("CARGO_PKG_VERSION")),
            verify_ssl: true,
        }
    }
}

impl std::fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("has_secret", &!self.secret.is_empty())
            .field("insecure", &self.insecure)
            .field("log_dir", &self.log_dir)
            .field("max_body_size", &self.max_body_size)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("verify_ssl", &self.verify_ssl)
            .finish()
    }
}

impl WebhookConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> WebhookConfigBuilder {
        WebhookConfigBuilder::new()
    }
}

/// Builder for WebhookConfig
#[derive(Debug, Clone, Default)]
pub struct WebhookConfigBuilder {
    config: WebhookConfig,
}

impl WebhookConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            config: WebhookConfig::default(),
        }
    }

    /// Set the shared secret
    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.config.secret = secret.into();
        self
    }

    /// Allow unsigned deliveries when the secret is empty
    pub fn insecure(mut self, insecure: bool) -> Self {
        self.config.insecure = insecure;
        self
    }

    /// Write event and diagnostic logs under this directory
    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.log_dir = Some(dir.into());
        self
    }

    /// Set maximum body size
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.config.max_body_size = size;
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout = Duration::from_secs(secs);
        self
    }

    /// Set the User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set SSL verification
    pub fn verify_ssl(mut self, verify: bool) -> Self {
        self.config.verify_ssl = verify;
        self
    }

    /// Build the configuration
    pub fn build(self) -> WebhookConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WebhookConfig::new();
        assert!(config.secret.is_empty());
        assert!(!config.insecure);
        assert!(config.log_dir.is_none());
        assert_eq!(config.max_body_size, 1024 * 1024);
        assert!(config.verify_ssl);
        assert!(config.user_agent.starts_with("trackhook/"));
    }

    #[test]
    fn test_builder() {
        let config = WebhookConfig::builder()
            .secret("s3cret")
            .log_dir("/tmp/trackhook")
            .max_body_size(512)
            .timeout_secs(3)
            .verify_ssl(false)
            .build();

        assert_eq!(config.secret, "s3cret");
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/trackhook")));
        assert_eq!(config.max_body_size, 512);
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert!(!config.verify_ssl);
        assert!(!format!("{:?}", config).contains("s3cret"));
    }
}
