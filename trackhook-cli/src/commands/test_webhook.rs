//! Test-webhook command - send a signed sample delivery to an endpoint.

use colored::Colorize;
use trackhook_config::ConfigValidator;
use trackhook_webhooks::{EventType, WebhookSender, sample_payload};

use super::{Context, heading};
use crate::error::{CliError, CliResult};
use crate::{info, success, warn};

/// Event sent when none is given.
pub const DEFAULT_EVENT: &str = "trackings/update";

/// Resolve an event name of either protocol version.
pub fn parse_event(name: &str) -> CliResult<EventType> {
    EventType::parse(name)
        .map(|(_, event_type)| event_type)
        .ok_or_else(|| {
            let known: Vec<&str> = EventType::ALL.iter().map(EventType::v2_name).collect();
            CliError::InvalidArgument(format!(
                "unknown event type '{}' (expected one of: {})",
                name,
                known.join(", ")
            ))
        })
}

/// Warning shown when deliveries are signed without a configured secret.
pub fn secret_warning(secret: &str) -> Option<&'static str> {
    secret.is_empty().then_some(
        "No webhook secret configured; the delivery is signed with an empty key \
         and only an endpoint without a secret will accept it",
    )
}

/// Send one signed sample event and print what happened.
pub async fn run(ctx: &Context, url: Option<&str>, event: &str) -> CliResult<()> {
    let url = match url {
        Some(url) => {
            ConfigValidator::is_url(url, "url")?;
            url
        }
        None => ctx.settings.require_webhook_url()?,
    };
    let event_type = parse_event(event)?;

    if let Some(message) = secret_warning(&ctx.settings.webhook_secret) {
        warn(message);
    }

    let sender = WebhookSender::new(&ctx.webhook_config())?;
    let payload = sample_payload(event_type);

    info(&format!("Sending test webhook to {}", url.cyan()));
    info(&format!("Event: {}", event_type.v2_name().cyan()));

    let delivery = sender.send(url, &payload).await?;

    heading("Payload");
    let pretty = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| delivery.payload.clone());
    for line in pretty.lines() {
        println!("    {}", line);
    }
    heading("Signature");
    println!("    {}", delivery.signature);

    heading("Response");
    let status = delivery.status.to_string();
    let status = if delivery.is_success() {
        status.green()
    } else {
        status.red()
    };
    println!("  {} {}", "HTTP Code:".bright_white().bold(), status);
    println!("  {} {}", "Body:".bright_white().bold(), delivery.response_body);

    if delivery.is_success() {
        success("Webhook accepted");
    } else {
        warn("Webhook was rejected");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_event_accepts_both_versions() {
        assert_eq!(parse_event(DEFAULT_EVENT).unwrap(), EventType::TrackingUpdated);
        assert_eq!(parse_event("shipment_cancel").unwrap(), EventType::ShipmentCancelled);
    }

    #[test]
    fn test_secret_warning() {
        assert!(secret_warning("configured").is_none());

        let message = secret_warning("").unwrap();
        assert!(message.contains("empty key"));
        assert!(!message.contains("empty signature"));
    }

    #[test]
    fn test_parse_event_rejects_unknown() {
        let err = parse_event("trackings/teleport").unwrap_err();
        assert!(err.to_string().contains("trackings/teleport"));
        assert!(err.to_string().contains("trackings/create"));
    }
}
