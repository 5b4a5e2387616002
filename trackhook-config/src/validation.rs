// Configuration validation

use crate::{ConfigError, Result};
use std::net::SocketAddr;

/// Trait for validating configuration
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Reusable field checks
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate that a value is not empty
    pub fn not_empty(value: &str, field: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                field
            )));
        }
        Ok(())
    }

    /// Validate that a value is in a list of allowed values
    pub fn one_of(value: &str, allowed: &[&str], field: &str) -> Result<()> {
        if !allowed.contains(&value) {
            return Err(ConfigError::ValidationError(format!(
                "{} must be one of: {}",
                field,
                allowed.join(", ")
            )));
        }
        Ok(())
    }

    /// Validate URL format
    pub fn is_url(value: &str, field: &str) -> Result<()> {
        if !value.starts_with("http://") && !value.starts_with("https://") {
            return Err(ConfigError::ValidationError(format!(
                "{} must be an http(s) URL",
                field
            )));
        }
        Ok(())
    }

    /// Validate a `host:port` socket address
    pub fn is_socket_addr(value: &str, field: &str) -> Result<()> {
        value.parse::<SocketAddr>().map(|_| ()).map_err(|_| {
            ConfigError::ValidationError(format!(
                "{} must be a socket address like 0.0.0.0:8080",
                field
            ))
        })
    }

    /// Validate that a number is positive
    pub fn positive(value: u64, field: &str) -> Result<()> {
        if value == 0 {
            return Err(ConfigError::ValidationError(format!(
                "{} must be greater than zero",
                field
            )));
        }
        Ok(())
    }
}
