//! Webhook receiver for shipment-tracking callbacks
//!
//! This crate authenticates and routes webhook deliveries from the tracking
//! provider:
//!
//! - **Signature verification**: `base64(HMAC-SHA256)` over the raw body,
//!   compared in constant time
//! - **Versioned routing**: v1 single-event and v2 batched deliveries, each
//!   event type mapped to one handler
//! - **Event log**: handler output recorded to daily files or memory
//! - **HTTP endpoint**: the request state machine plus a hyper server
//! - **Test sender**: signed sample deliveries to a running endpoint
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use trackhook_webhooks::{EventRouter, MemoryEventLog, WebhookEndpoint, WebhookReceiver};
//!
//! let log = Arc::new(MemoryEventLog::new());
//! let endpoint = WebhookEndpoint::new(WebhookReceiver::new("secret"), EventRouter::new(log));
//!
//! let response = endpoint.handle(&http::Method::POST, &http::HeaderMap::new(), b"{}");
//! assert_eq!(response.status, http::StatusCode::UNAUTHORIZED);
//! ```
//!
//! ## Serving
//!
//! ```rust,no_run
//! use trackhook_webhooks::{WebhookConfig, WebhookEndpoint, WebhookServer};
//!
//! # async fn example() -> trackhook_webhooks::Result<()> {
//! let config = WebhookConfig::builder()
//!     .secret("secret")
//!     .log_dir("logs")
//!     .build();
//!
//! let endpoint = WebhookEndpoint::from_config(&config)?;
//! WebhookServer::new(endpoint)
//!     .listen("0.0.0.0:8080".parse().unwrap())
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod diagnostics;
mod endpoint;
mod error;
mod event;
pub mod handlers;
mod payload;
mod receiver;
mod router;
mod sender;
mod server;
mod signature;
mod sink;

pub use config::{WebhookConfig, WebhookConfigBuilder};
pub use diagnostics::{Diagnostics, RequestRecord, SignatureTrace};
pub use endpoint::{EndpointResponse, WebhookEndpoint};
pub use error::WebhookError;
pub use event::{EventType, ProtocolVersion, Subject};
pub use payload::{Checkpoint, JsonPath, Shipment, Tracking, WebhookEvent};
pub use receiver::{Authentication, WebhookReceiver};
pub use router::{EventRouter, PayloadFormat, Route, RouteReport};
pub use sender::{Delivery, WebhookSender, sample_payload};
pub use server::WebhookServer;
pub use signature::{SIGNATURE_HEADER, WebhookSignature, compute_signature, verify};
pub use sink::{EventEntry, EventLog, FileEventLog, MemoryEventLog};

/// Result type for webhook operations
pub type Result<T> = std::result::Result<T, WebhookError>;
