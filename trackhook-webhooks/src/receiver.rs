//! Webhook receiver for authenticating and decoding deliveries
//!
//! Signatures are required: a delivery without the signature header is
//! rejected just like one whose signature does not match. The only way to
//! accept unsigned deliveries is an insecure receiver with no secret.

use crate::signature::SIGNATURE_HEADER;
use crate::{Result, WebhookConfig, WebhookError, WebhookSignature};
use http::HeaderMap;
use serde_json::Value;

/// Result of a successful authentication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authentication {
    /// Signature present and matching
    Verified,
    /// No secret configured in insecure mode
    Skipped,
}

/// Receiver for incoming webhooks
#[derive(Debug, Clone)]
pub struct WebhookReceiver {
    signature: WebhookSignature,
}

impl WebhookReceiver {
    /// Create a receiver that requires signatures made with `secret`
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            signature: WebhookSignature::new(secret),
        }
    }

    /// Create a receiver that accepts unsigned deliveries
    pub fn insecure() -> Self {
        Self::new("")
    }

    /// Create from configuration; an empty secret requires `insecure`
    pub fn from_config(config: &WebhookConfig) -> Result<Self> {
        if config.secret.is_empty() {
            if !config.insecure {
                return Err(WebhookError::ConfigError(
                    "webhook secret is empty and insecure mode is off".to_string(),
                ));
            }
            tracing::warn!("no webhook secret configured, signatures will not be checked");
            return Ok(Self::insecure());
        }
        Ok(Self::new(config.secret.clone()))
    }

    /// Whether signatures are checked at all
    pub fn is_enforcing(&self) -> bool {
        self.signature.has_secret()
    }

    /// Signature header value, trimmed; `None` when absent or empty
    pub fn signature_header(headers: &HeaderMap) -> Option<&str> {
        headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Verify an incoming webhook signature
    pub fn verify(&self, payload: &[u8], signature: &str) -> bool {
        self.signature.verify(payload, signature)
    }

    /// Authenticate a raw body against an optional signature
    pub fn authenticate(&self, payload: &[u8], signature: Option<&str>) -> Result<Authentication> {
        if !self.is_enforcing() {
            return Ok(Authentication::Skipped);
        }

        let signature = signature.ok_or(WebhookError::SignatureMissing)?;
        if self.verify(payload, signature) {
            Ok(Authentication::Verified)
        } else {
            Err(WebhookError::SignatureInvalid)
        }
    }

    /// Decode an authenticated body; JSON `null` counts as no payload
    pub fn parse(payload: &[u8]) -> Result<Value> {
        let value: Value = serde_json::from_slice(payload)?;
        if value.is_null() {
            return Err(WebhookError::EmptyPayload);
        }
        Ok(value)
    }

    /// Verify and parse an incoming webhook
    pub fn receive(&self, payload: &[u8], signature: Option<&str>) -> Result<Value> {
        self.authenticate(payload, signature)?;
        Self::parse(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_receive_signed() {
        let receiver = WebhookReceiver::new("secret");
        let body = br#"{"event":"tracking_update"}"#;
        let signature = WebhookSignature::new("secret").sign(body);

        let value = receiver.receive(body, Some(&signature)).unwrap();
        assert_eq!(value["event"], "tracking_update");
        assert_eq!(
            receiver.authenticate(body, Some(&signature)).unwrap(),
            Authentication::Verified
        );
    }

    #[test]
    fn test_missing_signature_is_rejected() {
        let receiver = WebhookReceiver::new("secret");
        assert!(matches!(
            receiver.receive(b"{}", None),
            Err(WebhookError::SignatureMissing)
        ));
    }

    #[test]
    fn test_wrong_signature_is_rejected() {
        let receiver = WebhookReceiver::new("secret");
        assert!(matches!(
            receiver.receive(b"{}", Some("bm9wZQ==")),
            Err(WebhookError::SignatureInvalid)
        ));
    }

    #[test]
    fn test_insecure_skips_verification() {
        let receiver = WebhookReceiver::insecure();
        assert!(!receiver.is_enforcing());
        assert_eq!(
            receiver.authenticate(b"{}", None).unwrap(),
            Authentication::Skipped
        );
    }

    #[test]
    fn test_from_config_fails_closed() {
        assert!(WebhookReceiver::from_config(&WebhookConfig::default()).is_err());

        let config = WebhookConfig::builder().insecure(true).build();
        assert!(!WebhookReceiver::from_config(&config).unwrap().is_enforcing());

        let config = WebhookConfig::builder().secret("s").build();
        assert!(WebhookReceiver::from_config(&config).unwrap().is_enforcing());
    }

    #[test]
    fn test_signature_header_lookup() {
        let mut headers = HeaderMap::new();
        assert_eq!(WebhookReceiver::signature_header(&headers), None);

        headers.insert("tracking-hmac-sha256", HeaderValue::from_static("  abc= "));
        assert_eq!(WebhookReceiver::signature_header(&headers), Some("abc="));

        headers.insert(
            http::HeaderName::from_bytes(SIGNATURE_HEADER.as_bytes()).unwrap(),
            HeaderValue::from_static(""),
        );
        assert_eq!(WebhookReceiver::signature_header(&headers), None);
    }

    #[test]
    fn test_parse() {
        assert!(matches!(
            WebhookReceiver::parse(b"null"),
            Err(WebhookError::EmptyPayload)
        ));
        assert!(matches!(
            WebhookReceiver::parse(b"{oops"),
            Err(WebhookError::MalformedPayload(_))
        ));
        assert!(WebhookReceiver::parse(b"[]").is_ok());
    }
}
