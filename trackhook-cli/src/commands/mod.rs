//! CLI command implementations.

pub mod serve;
pub mod test_webhook;
pub mod tracking;
pub mod webhook;

use colored::Colorize;
use std::time::Duration;
use trackhook_client::{ApiResponse, ApiVersion, ClientConfig, TrackingClient};
use trackhook_config::Settings;
use trackhook_webhooks::WebhookConfig;

use crate::error::{CliError, CliResult};

/// Settings plus command-line overrides shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    pub settings: Settings,
    pub insecure_tls: bool,
}

impl Context {
    pub fn new(settings: Settings, insecure_tls: bool) -> Self {
        Self {
            settings,
            insecure_tls,
        }
    }

    /// TLS verification after applying `--insecure-tls`.
    pub fn verify_tls(&self) -> bool {
        self.settings.verify_tls && !self.insecure_tls
    }

    /// Client for the provider API; requires an API key.
    pub fn client(&self) -> CliResult<TrackingClient> {
        let api_key = self.settings.require_api_key()?;
        let version: ApiVersion = self
            .settings
            .api_version
            .parse()
            .map_err(CliError::InvalidArgument)?;

        let mut builder = ClientConfig::builder()
            .api_key(api_key)
            .api_version(version)
            .verify_tls(self.verify_tls())
            .timeout(Duration::from_secs(self.settings.timeout_secs));

        if let Some(base_url) = &self.settings.api_base_url {
            builder = builder.base_url(base_url.clone());
        }

        Ok(TrackingClient::new(builder.build())?)
    }

    /// Webhook endpoint and sender configuration.
    pub fn webhook_config(&self) -> WebhookConfig {
        WebhookConfig::builder()
            .secret(self.settings.webhook_secret.clone())
            .insecure(self.settings.insecure)
            .log_dir(self.settings.log_dir.clone())
            .max_body_size(usize::try_from(self.settings.max_body_size).unwrap_or(usize::MAX))
            .timeout_secs(self.settings.timeout_secs)
            .verify_ssl(self.verify_tls())
            .build()
    }
}

/// Print the status line and decoded body of a provider response.
pub fn print_response(response: &ApiResponse) {
    let code = response.status_code.to_string();
    let code = if response.is_success() {
        code.green()
    } else {
        code.red()
    };
    println!("  {} {}", "HTTP Code:".bright_white().bold(), code);
    println!("  {}", "Response:".bright_white().bold());
    for line in response.pretty_body().lines() {
        println!("    {}", line);
    }
}

/// Print a section heading.
pub fn heading(title: &str) {
    println!();
    println!("  {}", format!("=== {} ===", title).bright_cyan().bold());
}
