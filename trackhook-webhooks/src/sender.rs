//! Signed test deliveries
//!
//! Sends a provider-shaped v2 payload to a webhook URL, signed the way the
//! provider signs it, so a deployed endpoint can be checked end to end.

use crate::event::{EventType, Subject};
use crate::signature::SIGNATURE_HEADER;
use crate::{Result, WebhookConfig, WebhookError, WebhookSignature};
use chrono::{Duration, SecondsFormat, Utc};
use reqwest::Client;
use serde::Serialize;
use serde_json::{Value, json};

/// Outcome of one test delivery
#[derive(Debug, Clone)]
pub struct Delivery {
    /// HTTP status returned by the endpoint
    pub status: u16,
    /// Response body as text
    pub response_body: String,
    /// Exact bytes that were signed and sent
    pub payload: String,
    /// Value of the signature header
    pub signature: String,
}

impl Delivery {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Client for sending signed test webhooks
#[derive(Debug, Clone)]
pub struct WebhookSender {
    http_client: Client,
    signature: WebhookSignature,
}

impl WebhookSender {
    /// Create a sender from configuration
    pub fn new(config: &WebhookConfig) -> Result<Self> {
        if !config.verify_ssl {
            tracing::warn!("TLS certificate verification is disabled for test deliveries");
        }

        let http_client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()?;

        Ok(Self {
            http_client,
            signature: WebhookSignature::new(config.secret.clone()),
        })
    }

    /// Serialize `payload` once, sign those bytes and POST them to `url`
    pub async fn send<T>(&self, url: &str, payload: &T) -> Result<Delivery>
    where
        T: Serialize + ?Sized,
    {
        let body = serde_json::to_string(payload)
            .map_err(|e| WebhookError::SerializationError(e.to_string()))?;
        let signature = self.signature.sign(body.as_bytes());

        tracing::info!(url, bytes = body.len(), "sending test webhook");

        let response = self
            .http_client
            .post(url)
            .header("Content-Type", "application/json")
            .header(SIGNATURE_HEADER, &signature)
            .body(body.clone())
            .send()
            .await?;

        let status = response.status().as_u16();
        let response_body = response.text().await?;

        tracing::info!(url, status, "test webhook delivered");

        Ok(Delivery {
            status,
            response_body,
            payload: body,
            signature,
        })
    }
}

/// A v2 delivery carrying one sample event of the given type
pub fn sample_payload(event_type: EventType) -> Value {
    let now = Utc::now();
    let timestamp = now.to_rfc3339_opts(SecondsFormat::Secs, true);
    let yesterday = (now - Duration::days(1)).to_rfc3339_opts(SecondsFormat::Secs, true);

    let mut event = json!({
        "time": now.timestamp(),
        "event": event_type.v2_name(),
        "domain": "example.com",
    });

    let subject = match event_type.subject() {
        Subject::Tracking => json!({
            "id": 50,
            "tracking_number": "600527447944",
            "courier": "jt",
            "status": "delivered",
            "customer_name": "Test User",
            "customer_email": "test@example.com",
            "customer_phone": "60123456789",
            "parcel_content": "Test Product",
            "order_number": "9456652",
            "created_at": yesterday,
            "updated_at": timestamp,
            "latest_checkpoint": {
                "time": timestamp,
                "status": "delivered",
                "content": "Delivered",
                "location": "Test Location"
            }
        }),
        Subject::Shipment => json!({
            "order_number": "9456652",
            "courier": "jt",
            "customer_name": "Test User",
            "created_at": yesterday,
            "updated_at": timestamp
        }),
    };
    event[event_type.subject().key()] = subject;

    json!({ "events": [event] })
}
