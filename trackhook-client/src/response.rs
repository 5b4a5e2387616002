//! Tracking API response wrapper.

use crate::Result;
use serde::de::DeserializeOwned;
use serde_json::Value;
use trackhook_webhooks::{JsonPath, Tracking};

/// Status, decoded body and raw text of a provider response.
///
/// Every status code is returned as data; callers decide what a failure is.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Body decoded as JSON, when it is JSON.
    pub body: Option<Value>,
    /// Body as received.
    pub raw_body: String,
}

impl ApiResponse {
    /// Build from a status code and raw body.
    pub fn new(status_code: u16, raw_body: impl Into<String>) -> Self {
        let raw_body = raw_body.into();
        let body = serde_json::from_str(&raw_body).ok();
        Self {
            status_code,
            body,
            raw_body,
        }
    }

    /// Create a response from a reqwest response.
    pub(crate) async fn from_reqwest(response: reqwest::Response) -> Result<Self> {
        let status_code = response.status().as_u16();
        let raw_body = response.text().await?;
        Ok(Self::new(status_code, raw_body))
    }

    /// Check if the response was successful (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Value at a dotted path inside the body.
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.body.as_ref().and_then(|b| b.get_path(path))
    }

    /// Parse the body into a typed value.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.raw_body)?)
    }

    /// The `tracking` object of a single-tracking response.
    pub fn tracking(&self) -> Option<Tracking> {
        self.get("tracking")
            .filter(|v| v.is_object())
            .and_then(|v| Tracking::from_value(v).ok())
    }

    /// The `trackings` list of a listing response; empty when absent.
    pub fn trackings(&self) -> Vec<Tracking> {
        self.get("trackings")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| Tracking::from_value(v).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Body pretty-printed, or the raw text when it is not JSON.
    pub fn pretty_body(&self) -> String {
        self.body
            .as_ref()
            .and_then(|b| serde_json::to_string_pretty(b).ok())
            .unwrap_or_else(|| self.raw_body.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_body() {
        let response = ApiResponse::new(
            200,
            r#"{"tracking":{"id":1,"tracking_number":"600527447944","courier":"jt"}}"#,
        );

        assert!(response.is_success());
        assert_eq!(response.get("tracking.courier"), Some(&json!("jt")));

        let tracking = response.tracking().unwrap();
        assert_eq!(tracking.tracking_number.as_deref(), Some("600527447944"));
        assert!(response.trackings().is_empty());
    }

    #[test]
    fn test_non_json_body() {
        let response = ApiResponse::new(502, "<html>Bad Gateway</html>");

        assert!(!response.is_success());
        assert!(response.body.is_none());
        assert!(response.tracking().is_none());
        assert_eq!(response.pretty_body(), "<html>Bad Gateway</html>");
        assert!(response.json::<Value>().is_err());
    }

    #[test]
    fn test_trackings_list() {
        let response = ApiResponse::new(
            200,
            r#"{"trackings":[{"tracking_number":"A"},{"tracking_number":"B"}]}"#,
        );

        let numbers: Vec<_> = response
            .trackings()
            .into_iter()
            .filter_map(|t| t.tracking_number)
            .collect();
        assert_eq!(numbers, vec!["A", "B"]);
    }
}
