//! Webhook subscription commands.

use trackhook_config::ConfigValidator;
use trackhook_webhooks::EventType;

use super::{Context, print_response};
use crate::error::CliResult;
use crate::{info, success, warn};

/// Every v2 event name, in subscription order.
pub fn subscribed_events() -> Vec<&'static str> {
    EventType::ALL.iter().map(EventType::v2_name).collect()
}

/// Subscribe the webhook URL to all events with the configured secret.
pub async fn register(ctx: &Context, url: Option<&str>) -> CliResult<()> {
    let url = match url {
        Some(url) => {
            ConfigValidator::is_url(url, "url")?;
            url
        }
        None => ctx.settings.require_webhook_url()?,
    };
    ConfigValidator::not_empty(&ctx.settings.webhook_secret, "webhook_secret")?;

    let client = ctx.client()?;
    let events = subscribed_events();

    info(&format!("Registering webhook {}", url));
    info(&format!("Events: {}", events.join(", ")));

    let response = client
        .register_webhook(url, &events, &ctx.settings.webhook_secret)
        .await?;

    print_response(&response);
    if response.is_success() {
        success("Webhook successfully registered!");
    } else {
        warn("Failed to register webhook.");
        println!("  Raw response: {}", response.raw_body);
    }
    Ok(())
}

/// Show the current webhook subscription.
pub async fn show_config(ctx: &Context) -> CliResult<()> {
    let client = ctx.client()?;

    info("Fetching webhook configuration...");
    let response = client.get_webhook_config().await?;

    print_response(&response);
    if !response.is_success() {
        warn("Failed to fetch webhook configuration.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribes_all_nine_events() {
        let events = subscribed_events();
        assert_eq!(events.len(), 9);
        assert_eq!(events[0], "trackings/create");
        assert_eq!(events[8], "shipments/generated");
    }
}
