//! HTTP/1.1 server for the webhook endpoint

use crate::endpoint::{EndpointResponse, WebhookEndpoint};
use crate::{Result, WebhookError};
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use serde_json::json;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Serves a [`WebhookEndpoint`] on every path
#[derive(Debug, Clone)]
pub struct WebhookServer {
    endpoint: Arc<WebhookEndpoint>,
}

impl WebhookServer {
    pub fn new(endpoint: WebhookEndpoint) -> Self {
        Self {
            endpoint: Arc::new(endpoint),
        }
    }

    /// Bind `addr` and serve until Ctrl-C
    pub async fn listen(self, addr: SocketAddr) -> Result<()> {
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve connections from `listener` until `shutdown` completes
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let addr = listener.local_addr()?;
        tracing::info!(%addr, "webhook server listening");

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            tracing::warn!(error = %e, "failed to accept connection");
                            continue;
                        }
                    };

                    let io = TokioIo::new(stream);
                    let endpoint = self.endpoint.clone();

                    tokio::spawn(async move {
                        let service = service_fn(move |req: Request<Incoming>| {
                            let endpoint = endpoint.clone();
                            async move { handle_request(req, endpoint).await }
                        });

                        if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                            tracing::debug!(%peer, error = %err, "error serving connection");
                        }
                    });
                }
                _ = &mut shutdown => {
                    tracing::info!("webhook server shutting down");
                    break;
                }
            }
        }

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "unable to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

/// Read the body within the size limit and run the endpoint off the runtime
async fn handle_request(
    req: Request<Incoming>,
    endpoint: Arc<WebhookEndpoint>,
) -> std::result::Result<Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();

    let body = match Limited::new(body, endpoint.max_body_size()).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            tracing::warn!(method = %parts.method, error = %e, "failed to read request body");
            let error = WebhookError::MalformedRequest(e.to_string());
            return Ok(into_response(EndpointResponse::from_error(&error)));
        }
    };

    let response = match tokio::task::spawn_blocking(move || {
        endpoint.handle(&parts.method, &parts.headers, &body)
    })
    .await
    {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "webhook handler failed");
            EndpointResponse::json(
                StatusCode::INTERNAL_SERVER_ERROR,
                &json!({ "error": "Internal error" }),
            )
        }
    };

    Ok(into_response(response))
}

fn into_response(response: EndpointResponse) -> Response<Full<Bytes>> {
    let mut res = Response::new(Full::new(response.body));
    *res.status_mut() = response.status;
    res.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(response.content_type));
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EventRouter, MemoryEventLog, WebhookReceiver, WebhookSignature};
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_serves_and_shuts_down() {
        let log = Arc::new(MemoryEventLog::new());
        let endpoint = WebhookEndpoint::new(
            WebhookReceiver::new("server-secret"),
            EventRouter::new(log.clone()),
        )
        .with_max_body_size(1024);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();

        let server = tokio::spawn(WebhookServer::new(endpoint).serve(listener, async move {
            stopped.await.ok();
        }));

        let client = reqwest::Client::new();
        let url = format!("http://{}/webhook", addr);

        let body = r#"{"event":"tracking_create","tracking":{"tracking_number":"S1"}}"#;
        let response = client
            .post(&url)
            .header(
                "Tracking-Hmac-Sha256",
                WebhookSignature::new("server-secret").sign(body.as_bytes()),
            )
            .body(body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(log.messages(), vec!["V1 Tracking created: S1"]);

        let response = client.get(&url).send().await.unwrap();
        assert_eq!(response.status(), 200);
        assert!(
            response.headers()[CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );

        let response = client.post(&url).body("x".repeat(4096)).send().await.unwrap();
        assert_eq!(response.status(), 400);

        stop.send(()).unwrap();
        server.await.unwrap().unwrap();
    }
}
