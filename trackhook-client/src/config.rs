//! Tracking API client configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Provider host without the version segment.
pub const DEFAULT_BASE_URL: &str = "https://seller.tracking.my/api";

/// Provider API version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiVersion {
    V1,
    #[default]
    V2,
}

impl ApiVersion {
    /// Path segment for this version.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "v1" | "1" => Ok(Self::V1),
            "v2" | "2" => Ok(Self::V2),
            other => Err(format!("unsupported API version: {}", other)),
        }
    }
}

/// Tracking API client configuration.
#[derive(Clone)]
pub struct ClientConfig {
    /// Key sent in the `Tracking-Api-Key` header.
    pub api_key: String,
    /// API version appended to the base URL.
    pub api_version: ApiVersion,
    /// Base URL without the version segment.
    pub base_url: String,
    /// Verify TLS certificates.
    pub verify_tls: bool,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_version: ApiVersion::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            verify_tls: true,
            timeout: Duration::from_secs(10),
            user_agent: format!("trackhook-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("base_url", &self.base_url)
            .field("verify_tls", &self.verify_tls)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Base URL including the version segment.
    pub fn versioned_base_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.api_version
        )
    }
}

/// Builder for tracking API client configuration.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API version.
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.config.api_version = version;
        self
    }

    /// Set the base URL (without the version segment).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Enable or disable TLS certificate verification.
    pub fn verify_tls(mut self, verify: bool) -> Self {
        self.config.verify_tls = verify;
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_version, ApiVersion::V2);
        assert!(config.verify_tls);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(
            config.versioned_base_url(),
            "https://seller.tracking.my/api/v2"
        );
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::builder()
            .api_key("key")
            .api_version(ApiVersion::V1)
            .base_url("http://localhost:9000/api/")
            .verify_tls(false)
            .build();

        assert_eq!(config.versioned_base_url(), "http://localhost:9000/api/v1");
        assert!(!config.verify_tls);
        assert!(!format!("{:?}", config).contains("\"key\""));
    }

    #[test]
    fn test_parse_version() {
        assert_eq!("V1".parse::<ApiVersion>().unwrap(), ApiVersion::V1);
        assert_eq!("v2".parse::<ApiVersion>().unwrap(), ApiVersion::V2);
        assert!("v3".parse::<ApiVersion>().is_err());
    }
}
