//! Request builder for provider calls.

use crate::{ApiResponse, ClientError, Result, TrackingClient};
use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use url::Url;

/// Header carrying the provider API key.
pub const API_KEY_HEADER: &str = "Tracking-Api-Key";

/// One request against the versioned base URL.
#[must_use = "requests do nothing unless sent"]
pub struct RequestBuilder<'a> {
    client: &'a TrackingClient,
    method: Method,
    segments: Vec<String>,
    body: Option<Vec<u8>>,
}

impl<'a> RequestBuilder<'a> {
    pub(crate) fn new(client: &'a TrackingClient, method: Method) -> Self {
        Self {
            client,
            method,
            segments: Vec::new(),
            body: None,
        }
    }

    /// Append a path segment; it is percent-encoded.
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Set a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, json: &T) -> Result<Self> {
        self.body = Some(serde_json::to_vec(json)?);
        Ok(self)
    }

    /// Build the request URL.
    pub fn build_url(&self) -> Result<Url> {
        build_url(self.client.base_url(), &self.segments)
    }

    /// Send the request.
    pub async fn send(self) -> Result<ApiResponse> {
        let url = self.build_url()?;

        tracing::debug!(method = %self.method, path = url.path(), "calling tracking API");

        let mut request = self
            .client
            .inner()
            .request(self.method.clone(), url)
            .header(API_KEY_HEADER, &self.client.config().api_key)
            .header(ACCEPT, "application/json");

        if let Some(body) = self.body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = ApiResponse::from_reqwest(request.send().await?).await?;

        if response.is_success() {
            tracing::debug!(method = %self.method, status = response.status_code, "tracking API responded");
        } else {
            tracing::warn!(method = %self.method, status = response.status_code, "tracking API returned an error status");
        }

        Ok(response)
    }
}

/// Append percent-encoded segments to a base URL.
pub(crate) fn build_url(base: &Url, segments: &[String]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ClientError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url() {
        let base = Url::parse("https://seller.tracking.my/api/v2").unwrap();
        let url = build_url(&base, &["trackings".into(), "jt".into(), "600527447944".into()])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://seller.tracking.my/api/v2/trackings/jt/600527447944"
        );
    }

    #[test]
    fn test_segments_are_encoded() {
        let base = Url::parse("https://seller.tracking.my/api/v2/").unwrap();
        let url = build_url(&base, &["trackings".into(), "j t".into(), "a/b?c".into()]).unwrap();
        assert_eq!(
            url.path(),
            "/api/v2/trackings/j%20t/a%2Fb%3Fc"
        );
        assert!(url.query().is_none());
    }

    #[test]
    fn test_cannot_be_base() {
        let base = Url::parse("mailto:ops@example.com").unwrap();
        assert!(matches!(
            build_url(&base, &["x".into()]),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}
