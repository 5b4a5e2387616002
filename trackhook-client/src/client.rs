//! Tracking API client implementation.

use reqwest::Method;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use url::Url;

use crate::{ApiResponse, ClientConfig, ClientError, RequestBuilder, Result};

/// Client for the tracking provider's REST API.
///
/// One request per call; no retries.
#[derive(Clone)]
pub struct TrackingClient {
    inner: reqwest::Client,
    config: Arc<ClientConfig>,
    base_url: Url,
}

impl TrackingClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(ClientError::Config("API key is empty".to_string()));
        }

        let base_url = Url::parse(&config.versioned_base_url())?;

        if !config.verify_tls {
            tracing::warn!("TLS certificate verification is disabled; use only for development");
        }

        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()?;

        Ok(Self {
            inner,
            config: Arc::new(config),
            base_url,
        })
    }

    /// Get the underlying reqwest client.
    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Versioned base URL every path is appended to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Start a request with a custom method.
    pub fn request(&self, method: Method) -> RequestBuilder<'_> {
        RequestBuilder::new(self, method)
    }

    /// List trackings.
    pub async fn get_trackings(&self) -> Result<ApiResponse> {
        self.request(Method::GET).segment("trackings").send().await
    }

    /// Create a tracking from a JSON object.
    pub async fn create_tracking<T: Serialize + ?Sized>(&self, data: &T) -> Result<ApiResponse> {
        self.request(Method::POST)
            .segment("trackings")
            .json(data)?
            .send()
            .await
    }

    /// Fetch one tracking.
    pub async fn get_tracking(&self, courier: &str, tracking_number: &str) -> Result<ApiResponse> {
        self.request(Method::GET)
            .segment("trackings")
            .segment(courier)
            .segment(tracking_number)
            .send()
            .await
    }

    /// Delete one tracking.
    pub async fn delete_tracking(
        &self,
        courier: &str,
        tracking_number: &str,
    ) -> Result<ApiResponse> {
        self.request(Method::DELETE)
            .segment("trackings")
            .segment(courier)
            .segment(tracking_number)
            .send()
            .await
    }

    /// Subscribe `url` to `events`, signed with `secret`.
    pub async fn register_webhook(
        &self,
        url: &str,
        events: &[&str],
        secret: &str,
    ) -> Result<ApiResponse> {
        let body = json!({
            "url": url,
            "events": events,
            "secret_key": secret,
        });

        self.request(Method::PUT)
            .segment("webhook")
            .json(&body)?
            .send()
            .await
    }

    /// Current webhook subscription.
    pub async fn get_webhook_config(&self) -> Result<ApiResponse> {
        self.request(Method::GET).segment("webhook").send().await
    }

    /// Supported couriers.
    pub async fn get_couriers(&self) -> Result<ApiResponse> {
        self.request(Method::GET).segment("couriers").send().await
    }
}

impl std::fmt::Debug for TrackingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackingClient")
            .field("config", &self.config)
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ApiVersion;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const API_KEY: &str = "test-api-key";

    fn client_for(server: &MockServer, version: ApiVersion) -> TrackingClient {
        TrackingClient::new(
            ClientConfig::builder()
                .api_key(API_KEY)
                .api_version(version)
                .base_url(format!("{}/api", server.uri()))
                .build(),
        )
        .unwrap()
    }

    #[test]
    fn test_requires_api_key() {
        assert!(matches!(
            TrackingClient::new(ClientConfig::default()),
            Err(ClientError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_get_tracking() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/trackings/jt/600527447944"))
            .and(header("Tracking-Api-Key", API_KEY))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracking": {
                    "id": 50,
                    "tracking_number": "600527447944",
                    "courier": "jt",
                    "status": "delivered"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, ApiVersion::V2);
        let response = client.get_tracking("jt", "600527447944").await.unwrap();

        assert_eq!(response.status_code, 200);
        let tracking = response.tracking().unwrap();
        assert_eq!(tracking.id.as_deref(), Some("50"));
        assert_eq!(tracking.status.as_deref(), Some("delivered"));
    }

    #[tokio::test]
    async fn test_not_found_is_data() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v2/trackings/jt/missing"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "Tracking not found"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, ApiVersion::V2);
        let response = client.get_tracking("jt", "missing").await.unwrap();

        assert_eq!(response.status_code, 404);
        assert!(!response.is_success());
        assert_eq!(response.get("message"), Some(&json!("Tracking not found")));
        assert!(response.raw_body.contains("Tracking not found"));
    }

    #[tokio::test]
    async fn test_create_tracking_posts_json() {
        let server = MockServer::start().await;
        let data = json!({"tracking_number": "X1", "courier": "jt", "order_id": 123456});

        Mock::given(method("POST"))
            .and(path("/api/v1/trackings"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(&data))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"tracking": {"id": 1}})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, ApiVersion::V1);
        let response = client.create_tracking(&data).await.unwrap();

        assert_eq!(response.status_code, 201);
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_register_webhook() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/api/v2/webhook"))
            .and(header_exists("Tracking-Api-Key"))
            .and(body_json(json!({
                "url": "https://example.com/webhook",
                "events": ["trackings/create", "shipments/cancel"],
                "secret_key": "shh"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, ApiVersion::V2);
        let response = client
            .register_webhook(
                "https://example.com/webhook",
                &["trackings/create", "shipments/cancel"],
                "shh",
            )
            .await
            .unwrap();

        assert_eq!(response.status_code, 200);
    }

    #[tokio::test]
    async fn test_parameterless_gets() {
        let server = MockServer::start().await;

        for endpoint in ["/api/v2/webhook", "/api/v2/couriers", "/api/v2/trackings"] {
            Mock::given(method("GET"))
                .and(path(endpoint))
                .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
                .expect(1)
                .mount(&server)
                .await;
        }

        let client = client_for(&server, ApiVersion::V2);
        assert_eq!(client.get_webhook_config().await.unwrap().status_code, 200);
        assert_eq!(client.get_couriers().await.unwrap().status_code, 200);
        assert_eq!(client.get_trackings().await.unwrap().status_code, 200);
    }

    #[tokio::test]
    async fn test_delete_tracking_encodes_path() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/v2/trackings/jt/A%20B"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, ApiVersion::V2);
        let response = client.delete_tracking("jt", "A B").await.unwrap();

        assert_eq!(response.status_code, 204);
        assert!(response.body.is_none());
    }

    #[tokio::test]
    async fn test_transport_error() {
        let client = TrackingClient::new(
            ClientConfig::builder()
                .api_key(API_KEY)
                .base_url("http://127.0.0.1:9/api")
                .timeout(Duration::from_secs(1))
                .build(),
        )
        .unwrap();

        let err = client.get_couriers().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
