//! Webhook payload model
//!
//! Handlers work on the decoded JSON as delivered so that unknown fields pass
//! through to the event log untouched. The typed views below are tolerant:
//! every field may be missing, numbers are accepted where strings are
//! expected, and anything unrecognized is kept in `extra`.

use crate::event::{EventType, ProtocolVersion, Subject};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Safe nested lookup on decoded JSON.
///
/// Paths are dot separated; numeric segments index into arrays. Absent keys
/// and type mismatches yield `None`.
pub trait JsonPath {
    /// Value at `path`
    fn get_path(&self, path: &str) -> Option<&Value>;

    /// String at `path`
    fn get_str(&self, path: &str) -> Option<&str> {
        self.get_path(path).and_then(Value::as_str)
    }

    /// String or number at `path`, rendered as text
    fn get_text(&self, path: &str) -> Option<String> {
        match self.get_path(path)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl JsonPath for Value {
    fn get_path(&self, path: &str) -> Option<&Value> {
        if path.is_empty() {
            return Some(self);
        }

        path.split('.').try_fold(self, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }
}

/// One provider checkpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A tracked parcel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tracking {
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub courier: Option<String>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub short_link: Option<String>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub parcel_content: Option<String>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::object", skip_serializing_if = "Option::is_none")]
    pub latest_checkpoint: Option<Checkpoint>,
    /// Newest first, as delivered
    #[serde(default, deserialize_with = "lenient::list")]
    pub checkpoints: Vec<Checkpoint>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Tracking {
    /// Decode a tracking object
    pub fn from_value(value: &Value) -> serde_json::Result<Self> {
        Self::deserialize(value)
    }

    /// Explicit `latest_checkpoint`, otherwise the first of `checkpoints`
    pub fn latest(&self) -> Option<&Checkpoint> {
        self.latest_checkpoint
            .as_ref()
            .or_else(|| self.checkpoints.first())
    }
}

/// A shipment; only the order number is interpreted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Shipment {
    /// Decode a shipment object
    pub fn from_value(value: &Value) -> serde_json::Result<Self> {
        Self::deserialize(value)
    }
}

/// One routed event, borrowing the decoded payload
#[derive(Debug, Clone, Copy)]
pub struct WebhookEvent<'a> {
    pub event_type: EventType,
    pub version: ProtocolVersion,
    /// The whole v1 payload, or one element of the v2 `events` array
    pub payload: &'a Value,
}

impl<'a> WebhookEvent<'a> {
    pub fn new(event_type: EventType, version: ProtocolVersion, payload: &'a Value) -> Self {
        Self {
            event_type,
            version,
            payload,
        }
    }

    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        self.event_type.name(self.version)
    }

    /// The tracking or shipment object, whichever the event type carries
    pub fn subject(&self) -> Option<&'a Value> {
        self.payload
            .get(self.event_type.subject().key())
            .filter(|v| v.is_object())
    }

    /// Typed tracking, for tracking events
    pub fn tracking(&self) -> Option<Tracking> {
        if self.event_type.subject() != Subject::Tracking {
            return None;
        }
        self.subject().and_then(|v| Tracking::from_value(v).ok())
    }

    /// Typed shipment, for shipment events
    pub fn shipment(&self) -> Option<Shipment> {
        if self.event_type.subject() != Subject::Shipment {
            return None;
        }
        self.subject().and_then(|v| Shipment::from_value(v).ok())
    }

    /// Delivery time (v2 only)
    pub fn time(&self) -> Option<i64> {
        self.payload.get("time").and_then(Value::as_i64)
    }

    /// Seller domain (v2 only)
    pub fn domain(&self) -> Option<&'a str> {
        self.payload.get("domain").and_then(Value::as_str)
    }
}

mod lenient {
    use serde::de::{DeserializeOwned, Error};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
    }

    // Empty arrays stand in for missing objects in some provider payloads.
    pub fn object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        match Value::deserialize(deserializer)? {
            value @ Value::Object(_) => serde_json::from_value(value).map(Some).map_err(D::Error::custom),
            _ => Ok(None),
        }
    }

    // Elements that do not decode are dropped; the rest keep their order.
    pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        match Value::deserialize(deserializer)? {
            Value::Array(items) => Ok(items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect()),
            _ => Ok(Vec::new()),
        }
    }
}
