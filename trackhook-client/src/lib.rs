//! # trackhook client
//!
//! REST client for the shipment-tracking provider: create, fetch, list and
//! delete trackings, manage the webhook subscription and list couriers.
//!
//! Every call returns an [`ApiResponse`] holding the status code, the body
//! decoded as JSON when possible, and the raw body text. Non-2xx statuses are
//! data, not errors; only transport failures produce a [`ClientError`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use trackhook_client::{ClientConfig, TrackingClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TrackingClient::new(ClientConfig::builder().api_key("key").build())?;
//!
//!     let response = client.get_tracking("jt", "600527447944").await?;
//!     println!("Status: {}", response.status_code);
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod request;
mod response;

pub use client::TrackingClient;
pub use config::{ApiVersion, ClientConfig, ClientConfigBuilder, DEFAULT_BASE_URL};
pub use error::{ClientError, Result};
pub use request::{API_KEY_HEADER, RequestBuilder};
pub use response::ApiResponse;

// Re-exported for convenience
pub use reqwest::Method;
pub use trackhook_webhooks::{Checkpoint, Tracking};
