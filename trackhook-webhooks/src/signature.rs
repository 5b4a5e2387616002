//! Webhook signature generation and verification
//!
//! The provider signs every delivery with `base64(HMAC-SHA256(secret, body))`
//! over the exact bytes of the request body and sends it in the
//! [`SIGNATURE_HEADER`] header.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the body signature. Matched case-insensitively.
pub const SIGNATURE_HEADER: &str = "Tracking-Hmac-Sha256";

/// Signing and verification bound to one shared secret
#[derive(Clone)]
pub struct WebhookSignature {
    secret: String,
}

impl WebhookSignature {
    /// Create a new signature utility with the given secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Whether a non-empty secret is configured
    pub fn has_secret(&self) -> bool {
        !self.secret.is_empty()
    }

    /// Signature for the given raw body
    pub fn sign(&self, payload: &[u8]) -> String {
        compute_signature(payload, &self.secret)
    }

    /// Check a received signature against the raw body
    pub fn verify(&self, payload: &[u8], signature: &str) -> bool {
        verify(payload, signature, &self.secret)
    }
}

impl std::fmt::Debug for WebhookSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookSignature")
            .field("has_secret", &self.has_secret())
            .finish()
    }
}

/// Compute `base64(HMAC-SHA256(secret, payload))`.
pub fn compute_signature(payload: &[u8], secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take any size key");
    mac.update(payload);
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Verify a received signature for a raw body.
///
/// An empty `secret` disables verification and always returns `true`;
/// callers decide whether that mode is allowed. An empty signature never
/// matches a configured secret.
pub fn verify(raw_body: &[u8], received_signature: &str, secret: &str) -> bool {
    if secret.is_empty() {
        return true;
    }
    if received_signature.is_empty() {
        return false;
    }

    let expected = compute_signature(raw_body, secret);
    constant_time_compare(expected.as_bytes(), received_signature.as_bytes())
}

/// Constant-time comparison to prevent timing attacks
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
