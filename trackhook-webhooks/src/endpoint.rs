//! Webhook HTTP endpoint
//!
//! [`WebhookEndpoint::handle`] turns one received request into a response:
//!
//! 1. `GET` with an empty body gets a static HTML page.
//! 2. Anything but a non-empty `POST` within the size limit is rejected (400).
//! 3. The signature header is checked (401 when missing or wrong).
//! 4. The body is decoded (400 on invalid JSON or `null`).
//! 5. The payload is routed and `{"success": true}` returned.

use crate::diagnostics::{Diagnostics, RequestRecord, SignatureTrace};
use crate::receiver::{Authentication, WebhookReceiver};
use crate::router::{EventRouter, RouteReport};
use crate::sink::{EventLog, FileEventLog, MemoryEventLog};
use crate::{Result, WebhookConfig, WebhookError};
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

const BROWSER_PAGE: &str = "<h1>Tracking.my Webhook Endpoint</h1>\
<p>This is a webhook endpoint for tracking.my integration.</p>\
<p>It's designed to receive POST requests from tracking.my, not browser visits.</p>";

/// Response produced by the endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointResponse {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: Bytes,
}

impl EndpointResponse {
    /// JSON response
    pub fn json(status: StatusCode, value: &Value) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: Bytes::from(value.to_string()),
        }
    }

    /// `{"error": ...}` response for a rejected request
    pub fn from_error(error: &WebhookError) -> Self {
        Self::json(error.status_code(), &json!({ "error": error.public_message() }))
    }

    fn html(body: &'static str) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "text/html; charset=utf-8",
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    /// Body decoded as JSON, when it is JSON
    pub fn json_body(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }
}

/// Request handling pipeline for webhook deliveries
#[derive(Debug, Clone)]
pub struct WebhookEndpoint {
    receiver: WebhookReceiver,
    router: EventRouter,
    diagnostics: Diagnostics,
    max_body_size: usize,
}

impl WebhookEndpoint {
    /// Endpoint without diagnostic files and the default size limit
    pub fn new(receiver: WebhookReceiver, router: EventRouter) -> Self {
        Self {
            receiver,
            router,
            diagnostics: Diagnostics::disabled(),
            max_body_size: WebhookConfig::default().max_body_size,
        }
    }

    /// Build from configuration.
    ///
    /// With a log directory, events and diagnostics go to daily files there;
    /// otherwise events are kept in memory.
    pub fn from_config(config: &WebhookConfig) -> Result<Self> {
        let receiver = WebhookReceiver::from_config(config)?;

        let (log, diagnostics): (Arc<dyn EventLog>, Diagnostics) = match &config.log_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                (Arc::new(FileEventLog::new(dir.clone())), Diagnostics::new(dir.clone()))
            }
            None => (Arc::new(MemoryEventLog::new()), Diagnostics::disabled()),
        };

        Ok(Self::new(receiver, EventRouter::new(log))
            .with_diagnostics(diagnostics)
            .with_max_body_size(config.max_body_size))
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn with_max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    pub fn max_body_size(&self) -> usize {
        self.max_body_size
    }

    pub fn router(&self) -> &EventRouter {
        &self.router
    }

    /// Handle one request
    pub fn handle(&self, method: &Method, headers: &HeaderMap, body: &[u8]) -> EndpointResponse {
        if method == Method::GET && body.is_empty() {
            return EndpointResponse::html(BROWSER_PAGE);
        }

        let request_id = Uuid::new_v4().to_string();
        let signature = WebhookReceiver::signature_header(headers);

        self.diagnostics.record_request(&RequestRecord::new(
            &request_id,
            method.as_str(),
            headers,
            body,
            signature,
        ));

        match self.process(&request_id, method, body, signature) {
            Ok(report) => {
                tracing::info!(
                    request_id = %request_id,
                    format = ?report.format,
                    dispatched = report.dispatched,
                    unknown = report.unknown,
                    "webhook processed"
                );
                EndpointResponse::json(StatusCode::OK, &json!({ "success": true }))
            }
            Err(e) => {
                tracing::warn!(request_id = %request_id, error = %e, "webhook rejected");
                EndpointResponse::from_error(&e)
            }
        }
    }

    fn process(
        &self,
        request_id: &str,
        method: &Method,
        body: &[u8],
        signature: Option<&str>,
    ) -> Result<RouteReport> {
        if method != Method::POST {
            return Err(WebhookError::MalformedRequest(format!("method {}", method)));
        }
        if body.is_empty() {
            return Err(WebhookError::MalformedRequest("empty body".to_string()));
        }
        if body.len() > self.max_body_size {
            return Err(WebhookError::MalformedRequest(format!(
                "body of {} bytes exceeds limit of {}",
                body.len(),
                self.max_body_size
            )));
        }

        let authentication = self.receiver.authenticate(body, signature);
        if self.receiver.is_enforcing() {
            self.diagnostics.record_signature(&SignatureTrace::new(
                request_id,
                body,
                signature.is_some(),
                matches!(authentication, Ok(Authentication::Verified)),
            ));
        }
        authentication?;

        let payload = WebhookReceiver::parse(body)?;
        Ok(self.router.route(&payload))
    }
}
