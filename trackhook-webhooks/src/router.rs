//! Versioned event routing
//!
//! A v2 delivery carries an `events` array; every element is routed on its
//! own and an unknown element never stops its siblings. A v1 delivery is a
//! single object with an `event` field.

use crate::event::{EventType, ProtocolVersion};
use crate::handlers::{Handler, handler_for};
use crate::payload::WebhookEvent;
use crate::sink::EventLog;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Shape detected for a delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PayloadFormat {
    V1,
    V2,
    Unknown,
}

/// Outcome of routing one delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteReport {
    pub format: PayloadFormat,
    /// Events handed to a handler
    pub dispatched: usize,
    /// Events with a missing or unrecognized type
    pub unknown: usize,
}

impl RouteReport {
    fn new(format: PayloadFormat) -> Self {
        Self {
            format,
            dispatched: 0,
            unknown: 0,
        }
    }
}

/// One dispatch table entry
#[derive(Clone, Copy)]
pub struct Route {
    pub event_type: EventType,
    pub handler: Handler,
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("event_type", &self.event_type)
            .finish()
    }
}

/// Routes decoded payloads to handlers.
///
/// The dispatch tables are built once and never change.
#[derive(Clone)]
pub struct EventRouter {
    v1_routes: HashMap<&'static str, Route>,
    v2_routes: HashMap<&'static str, Route>,
    log: Arc<dyn EventLog>,
}

impl EventRouter {
    /// Router with a handler for every known event type
    pub fn new(log: Arc<dyn EventLog>) -> Self {
        Self {
            v1_routes: build_table(ProtocolVersion::V1),
            v2_routes: build_table(ProtocolVersion::V2),
            log,
        }
    }

    /// Sink the handlers write to
    pub fn event_log(&self) -> &Arc<dyn EventLog> {
        &self.log
    }

    /// Route one decoded delivery
    pub fn route(&self, payload: &Value) -> RouteReport {
        if let Some(events) = payload.get("events").and_then(Value::as_array) {
            let mut report = RouteReport::new(PayloadFormat::V2);
            for element in events {
                self.dispatch(ProtocolVersion::V2, element, &mut report);
            }
            report
        } else if payload.get("event").is_some_and(|event| !event.is_null()) {
            let mut report = RouteReport::new(PayloadFormat::V1);
            self.dispatch(ProtocolVersion::V1, payload, &mut report);
            report
        } else {
            tracing::warn!("unknown webhook format");
            self.log.record("Unknown webhook format", payload);
            RouteReport::new(PayloadFormat::Unknown)
        }
    }

    fn dispatch(&self, version: ProtocolVersion, element: &Value, report: &mut RouteReport) {
        let name = match element.get("event") {
            None | Some(Value::Null) => {
                tracing::warn!(version = %version, "event type not found");
                self.log
                    .record(&format!("{} Event type not found", version), element);
                report.unknown += 1;
                return;
            }
            Some(Value::String(name)) => name.as_str(),
            Some(other) => {
                tracing::warn!(version = %version, event = %other, "non-string event type");
                self.log
                    .record(&format!("Unknown {} event type: {}", version, other), element);
                report.unknown += 1;
                return;
            }
        };

        let table = match version {
            ProtocolVersion::V1 => &self.v1_routes,
            ProtocolVersion::V2 => &self.v2_routes,
        };

        match table.get(name) {
            Some(route) => {
                tracing::debug!(version = %version, event = name, "dispatching event");
                let event = WebhookEvent::new(route.event_type, version, element);
                (route.handler)(&event, self.log.as_ref());
                report.dispatched += 1;
            }
            None => {
                tracing::warn!(version = %version, event = name, "unknown event type");
                self.log
                    .record(&format!("Unknown {} event type: {}", version, name), element);
                report.unknown += 1;
            }
        }
    }
}

impl std::fmt::Debug for EventRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRouter")
            .field("v1_routes", &self.v1_routes.len())
            .field("v2_routes", &self.v2_routes.len())
            .finish()
    }
}

fn build_table(version: ProtocolVersion) -> HashMap<&'static str, Route> {
    EventType::ALL
        .iter()
        .map(|&event_type| {
            (
                event_type.name(version),
                Route {
                    event_type,
                    handler: handler_for(event_type),
                },
            )
        })
        .collect()
}
