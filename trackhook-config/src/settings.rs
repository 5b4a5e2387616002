//! Typed application settings.

use crate::{ConfigError, ConfigManager, ConfigValidator, ENV_PREFIX, Result, Validate};
use std::path::{Path, PathBuf};

/// Default file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "trackhook.toml";

/// Settings shared by the webhook server and the API utilities.
#[derive(Clone)]
pub struct Settings {
    /// Provider API key sent as `Tracking-Api-Key`
    pub api_key: String,
    /// Shared secret for webhook signatures
    pub webhook_secret: String,
    /// Public URL the provider delivers webhooks to
    pub webhook_url: String,
    /// Provider API version (`v1` or `v2`)
    pub api_version: String,
    /// Override for the provider base URL (without the version segment)
    pub api_base_url: Option<String>,
    /// Verify TLS certificates on outbound calls
    pub verify_tls: bool,
    /// Outbound request timeout in seconds
    pub timeout_secs: u64,
    /// Address the webhook server binds to
    pub bind_addr: String,
    /// Directory for the daily diagnostic log files
    pub log_dir: PathBuf,
    /// Accept unsigned webhooks when no secret is configured
    pub insecure: bool,
    /// Largest accepted webhook body in bytes
    pub max_body_size: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            webhook_secret: String::new(),
            webhook_url: String::new(),
            api_version: "v2".to_string(),
            api_base_url: None,
            verify_tls: true,
            timeout_secs: 10,
            bind_addr: "0.0.0.0:8080".to_string(),
            log_dir: PathBuf::from("logs"),
            insecure: false,
            max_body_size: 1024 * 1024,
        }
    }
}

// Secrets stay out of debug output.
impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &redact(&self.api_key))
            .field("webhook_secret", &redact(&self.webhook_secret))
            .field("webhook_url", &self.webhook_url)
            .field("api_version", &self.api_version)
            .field("api_base_url", &self.api_base_url)
            .field("verify_tls", &self.verify_tls)
            .field("timeout_secs", &self.timeout_secs)
            .field("bind_addr", &self.bind_addr)
            .field("log_dir", &self.log_dir)
            .field("insecure", &self.insecure)
            .field("max_body_size", &self.max_body_size)
            .finish()
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() { "<unset>" } else { "<redacted>" }
}

impl Settings {
    /// Load settings: config file, then `.env`, then `TRACKHOOK_*` variables.
    ///
    /// Without an explicit path, `trackhook.toml` in the working directory is
    /// used when present.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut manager = ConfigManager::with_prefix(ENV_PREFIX);

        match config_file {
            Some(path) => {
                manager.load_file(path)?;
            }
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    manager.load_file(default)?;
                }
            }
        }

        manager.load_dotenv(None)?;

        let settings = Self::from_manager(&manager)?;
        settings.validate()?;

        tracing::debug!(settings = ?settings, "configuration loaded");
        Ok(settings)
    }

    /// Build settings from already loaded values, filling defaults.
    pub fn from_manager(manager: &ConfigManager) -> Result<Self> {
        let defaults = Self::default();

        let api_base_url = if manager.has("api_base_url") {
            Some(manager.get_string("api_base_url")?).filter(|s| !s.is_empty())
        } else {
            None
        };

        Ok(Self {
            api_key: manager.string_or("api_key", "")?,
            webhook_secret: manager.string_or("webhook_secret", "")?,
            webhook_url: manager.string_or("webhook_url", "")?,
            api_version: manager
                .string_or("api_version", &defaults.api_version)?
                .to_lowercase(),
            api_base_url,
            verify_tls: manager.bool_or("verify_tls", defaults.verify_tls)?,
            timeout_secs: manager.u64_or("timeout_secs", defaults.timeout_secs)?,
            bind_addr: manager.string_or("bind_addr", &defaults.bind_addr)?,
            log_dir: PathBuf::from(manager.string_or("log_dir", "logs")?),
            insecure: manager.bool_or("insecure", defaults.insecure)?,
            max_body_size: manager.u64_or("max_body_size", defaults.max_body_size)?,
        })
    }

    /// API key, required by every provider call.
    pub fn require_api_key(&self) -> Result<&str> {
        ConfigValidator::not_empty(&self.api_key, "api_key")?;
        Ok(&self.api_key)
    }

    /// Public webhook URL, required for registration and test deliveries.
    pub fn require_webhook_url(&self) -> Result<&str> {
        ConfigValidator::not_empty(&self.webhook_url, "webhook_url")?;
        ConfigValidator::is_url(&self.webhook_url, "webhook_url")?;
        Ok(&self.webhook_url)
    }

    /// Settings needed to receive webhooks.
    ///
    /// An empty secret is refused unless `insecure` was explicitly enabled.
    pub fn validate_for_server(&self) -> Result<()> {
        if self.webhook_secret.is_empty() && !self.insecure {
            return Err(ConfigError::ValidationError(
                "webhook_secret cannot be empty; set insecure = true to accept unsigned webhooks"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        ConfigValidator::one_of(&self.api_version, &["v1", "v2"], "api_version")?;
        ConfigValidator::is_socket_addr(&self.bind_addr, "bind_addr")?;
        ConfigValidator::positive(self.timeout_secs, "timeout_secs")?;
        ConfigValidator::positive(self.max_body_size, "max_body_size")?;

        if let Some(url) = &self.api_base_url {
            ConfigValidator::is_url(url, "api_base_url")?;
        }
        if !self.webhook_url.is_empty() {
            ConfigValidator::is_url(&self.webhook_url, "webhook_url")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn manager(pairs: &[(&str, &str)]) -> ConfigManager {
        let mut manager = ConfigManager::new();
        manager.merge_strings(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        );
        manager
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_manager(&ConfigManager::new()).unwrap();

        assert_eq!(settings.api_version, "v2");
        assert!(settings.verify_tls);
        assert_eq!(settings.timeout_secs, 10);
        assert_eq!(settings.bind_addr, "0.0.0.0:8080");
        assert_eq!(settings.log_dir, PathBuf::from("logs"));
        assert!(!settings.insecure);
        assert_eq!(settings.max_body_size, 1024 * 1024);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_values_from_manager() {
        let settings = Settings::from_manager(&manager(&[
            ("api_key", "key"),
            ("webhook_secret", "secret"),
            ("webhook_url", "https://example.com/webhook"),
            ("api_version", "V1"),
            ("verify_tls", "false"),
            ("max_body_size", "4096"),
        ]))
        .unwrap();

        assert_eq!(settings.require_api_key().unwrap(), "key");
        assert_eq!(
            settings.require_webhook_url().unwrap(),
            "https://example.com/webhook"
        );
        assert_eq!(settings.api_version, "v1");
        assert!(!settings.verify_tls);
        assert_eq!(settings.max_body_size, 4096);
        assert!(settings.validate().is_ok());
        assert!(settings.validate_for_server().is_ok());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let settings = Settings::from_manager(&manager(&[("api_version", "v3")])).unwrap();
        assert!(settings.validate().is_err());

        let settings = Settings::from_manager(&manager(&[("bind_addr", "nowhere")])).unwrap();
        assert!(settings.validate().is_err());

        let settings = Settings::from_manager(&manager(&[("webhook_url", "ftp://x")])).unwrap();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_empty_secret_fails_closed() {
        let settings = Settings::default();
        assert!(settings.validate_for_server().is_err());

        let settings = Settings {
            insecure: true,
            ..Settings::default()
        };
        assert!(settings.validate_for_server().is_ok());
    }

    #[test]
    fn test_missing_api_key() {
        let settings = Settings::default();
        assert!(settings.require_api_key().is_err());
        assert!(settings.require_webhook_url().is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let settings = Settings {
            api_key: "key-123".to_string(),
            webhook_secret: "very-secret".to_string(),
            ..Settings::default()
        };

        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("key-123"));
        assert!(!rendered.contains("very-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"api_key": "file-key", "webhook_secret": "file-secret", "timeout_secs": 5}"#,
        )
        .unwrap();

        let mut manager = ConfigManager::new();
        manager.load_file(&path).unwrap();
        let settings = Settings::from_manager(&manager).unwrap();

        assert_eq!(settings.api_key, "file-key");
        assert_eq!(settings.webhook_secret, "file-secret");
        assert_eq!(settings.timeout_secs, 5);
        assert!(settings.validate().is_ok());
    }
}
