//! Configuration management for trackhook.
//!
//! Values are layered: a config file (JSON, TOML or `.env` style) is read
//! first, then `TRACKHOOK_*` environment variables (including those from a
//! `.env` file in the working directory) override it. [`Settings`] is the
//! typed view used by the server and the command-line utilities.

pub mod env;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use env::EnvLoader;
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use settings::Settings;
pub use validation::{ConfigValidator, Validate};

use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Prefix for environment variables read by [`ConfigManager::load_env`].
pub const ENV_PREFIX: &str = "TRACKHOOK";

/// Layered key/value store backing [`Settings`]
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    values: HashMap<String, Value>,
    env_prefix: Option<String>,
}

impl ConfigManager {
    /// Create an empty manager that reads unprefixed environment variables
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with environment variable prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            values: HashMap::new(),
            env_prefix: Some(prefix.into()),
        }
    }

    /// Load configuration from environment variables
    pub fn load_env(&mut self) -> &mut Self {
        let loader = EnvLoader::new(self.env_prefix.clone());
        self.merge_strings(loader.load());
        self
    }

    /// Load a `.env` file into the process environment, then read it
    ///
    /// A missing default `.env` is not an error; an explicit path must exist.
    pub fn load_dotenv(&mut self, path: Option<&Path>) -> Result<&mut Self> {
        match path {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
            }
            None => {
                dotenvy::dotenv().ok();
            }
        }
        Ok(self.load_env())
    }

    /// Load configuration from file, auto-detecting its format
    pub fn load_file(&mut self, path: &Path) -> Result<&mut Self> {
        let data = ConfigLoader::auto(path)?.load_file(path)?;

        if let Value::Object(map) = data {
            self.values.extend(map);
        }

        Ok(self)
    }

    /// Merge plain string values (as read from the environment)
    pub fn merge_strings(&mut self, values: HashMap<String, String>) {
        for (key, value) in values {
            self.values.insert(key, Value::String(value));
        }
    }

    /// Set a configuration value
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Check if a key exists
    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Raw value for a key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// String value; numbers and booleans are rendered as text
    pub fn get_string(&self, key: &str) -> Result<String> {
        match self.require(key)? {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(type_mismatch(key, "a string", other)),
        }
    }

    /// Boolean value; accepts `true/false/1/0/yes/no/on/off` strings
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        match self.require(key)? {
            Value::Bool(b) => Ok(*b),
            Value::Number(n) => Ok(n.as_u64().unwrap_or(0) != 0),
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(true),
                "false" | "0" | "no" | "off" | "" => Ok(false),
                _ => Err(type_mismatch(key, "a boolean", &Value::String(s.clone()))),
            },
            other => Err(type_mismatch(key, "a boolean", other)),
        }
    }

    /// Unsigned integer value; numeric strings are parsed
    pub fn get_u64(&self, key: &str) -> Result<u64> {
        match self.require(key)? {
            Value::Number(n) => n
                .as_u64()
                .ok_or_else(|| type_mismatch(key, "an unsigned integer", &Value::Number(n.clone()))),
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|_| type_mismatch(key, "an unsigned integer", &Value::String(s.clone()))),
            other => Err(type_mismatch(key, "an unsigned integer", other)),
        }
    }

    /// String value or a default when the key is absent
    pub fn string_or(&self, key: &str, default: &str) -> Result<String> {
        if self.has(key) {
            self.get_string(key)
        } else {
            Ok(default.to_string())
        }
    }

    /// Boolean value or a default when the key is absent
    pub fn bool_or(&self, key: &str, default: bool) -> Result<bool> {
        if self.has(key) {
            self.get_bool(key)
        } else {
            Ok(default)
        }
    }

    /// Integer value or a default when the key is absent
    pub fn u64_or(&self, key: &str, default: u64) -> Result<u64> {
        if self.has(key) {
            self.get_u64(key)
        } else {
            Ok(default)
        }
    }

    /// Get all configuration keys
    pub fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    fn require(&self, key: &str) -> Result<&Value> {
        self.values
            .get(key)
            .ok_or_else(|| ConfigError::KeyNotFound(key.to_string()))
    }
}

fn type_mismatch(key: &str, expected: &str, found: &Value) -> ConfigError {
    ConfigError::TypeMismatch {
        key: key.to_string(),
        message: format!("expected {}, found {}", expected, found),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut manager = ConfigManager::new();
        manager.set("api_key", "abc");

        assert!(manager.has("api_key"));
        assert_eq!(manager.get_string("api_key").unwrap(), "abc");
        assert!(matches!(
            manager.get_string("missing"),
            Err(ConfigError::KeyNotFound(_))
        ));
    }

    #[test]
    fn test_string_coercions() {
        let mut manager = ConfigManager::new();
        manager.merge_strings(HashMap::from([
            ("verify_tls".to_string(), "false".to_string()),
            ("insecure".to_string(), "1".to_string()),
            ("max_body_size".to_string(), "2048".to_string()),
            ("api_key".to_string(), "12345".to_string()),
        ]));

        assert!(!manager.get_bool("verify_tls").unwrap());
        assert!(manager.get_bool("insecure").unwrap());
        assert_eq!(manager.get_u64("max_body_size").unwrap(), 2048);
        assert_eq!(manager.get_string("api_key").unwrap(), "12345");
    }

    #[test]
    fn test_typed_values_render_as_strings() {
        let mut manager = ConfigManager::new();
        manager.set("api_key", 12345);
        manager.set("verify_tls", false);

        assert_eq!(manager.get_string("api_key").unwrap(), "12345");
        assert!(!manager.get_bool("verify_tls").unwrap());
    }

    #[test]
    fn test_type_mismatch() {
        let mut manager = ConfigManager::new();
        manager.set("max_body_size", "lots");
        manager.set("verify_tls", "maybe");

        assert!(matches!(
            manager.get_u64("max_body_size"),
            Err(ConfigError::TypeMismatch { .. })
        ));
        assert!(manager.get_bool("verify_tls").is_err());
    }

    #[test]
    fn test_defaults() {
        let manager = ConfigManager::new();
        assert_eq!(manager.string_or("log_dir", "logs").unwrap(), "logs");
        assert!(manager.bool_or("verify_tls", true).unwrap());
        assert_eq!(manager.u64_or("max_body_size", 10).unwrap(), 10);
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trackhook.toml");
        std::fs::write(&path, "api_key = \"from-file\"\nlog_dir = \"/tmp/logs\"\n").unwrap();

        let mut manager = ConfigManager::with_prefix(ENV_PREFIX);
        manager.load_file(&path).unwrap();
        manager.merge_strings(HashMap::from([(
            "api_key".to_string(),
            "from-env".to_string(),
        )]));

        assert_eq!(manager.get_string("api_key").unwrap(), "from-env");
        assert_eq!(manager.get_string("log_dir").unwrap(), "/tmp/logs");
    }
}
