// trackhook - webhook receiver and API client for a shipment-tracking provider
//
// The receiver verifies HMAC-signed deliveries, routes v1 and v2 events to
// handlers and records their output. The client manages trackings and the
// webhook subscription over the provider's REST API.

// Re-export the receiver
pub use trackhook_webhooks::*;

// Re-export optional crates
#[cfg(feature = "client")]
pub use trackhook_client;

#[cfg(feature = "config")]
pub use trackhook_config;

#[cfg(feature = "log")]
pub use trackhook_log;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        EndpointResponse,
        EventLog,
        EventRouter,
        EventType,
        FileEventLog,
        MemoryEventLog,
        ProtocolVersion,
        WebhookConfig,
        WebhookEndpoint,
        WebhookError,
        WebhookEvent,
        WebhookReceiver,
        WebhookServer,
        WebhookSignature,
    };

    #[cfg(feature = "client")]
    pub use trackhook_client::{ApiResponse, ClientConfig, TrackingClient};

    #[cfg(feature = "config")]
    pub use trackhook_config::Settings;
}
