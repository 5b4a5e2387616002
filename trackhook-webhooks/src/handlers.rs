//! Event handlers
//!
//! Each handler reads a few fields from the event's subject and appends an
//! entry carrying the full subject object to the event log. The same
//! function serves the v1 and v2 spelling of an event; the version only
//! changes the message prefix.

use crate::event::EventType;
use crate::payload::{JsonPath, Tracking, WebhookEvent};
use crate::sink::EventLog;
use serde_json::Value;

/// Handler signature stored in the dispatch table
pub type Handler = fn(&WebhookEvent<'_>, &dyn EventLog);

const UNKNOWN: &str = "<unknown>";

/// Handler for an event type
pub fn handler_for(event_type: EventType) -> Handler {
    match event_type {
        EventType::TrackingCreated => tracking_created,
        EventType::TrackingUpdated => tracking_updated,
        EventType::CheckpointUpdated => checkpoint_updated,
        EventType::TrackingDeleted => tracking_deleted,
        EventType::ShipmentCreated => shipment_created,
        EventType::ShipmentUpdated => shipment_updated,
        EventType::ShipmentDeleted => shipment_deleted,
        EventType::ShipmentCancelled => shipment_cancelled,
        EventType::ShipmentGenerated => shipment_generated,
    }
}

pub fn tracking_created(event: &WebhookEvent<'_>, log: &dyn EventLog) {
    record_subject(event, log, "tracking_number");
}

pub fn tracking_updated(event: &WebhookEvent<'_>, log: &dyn EventLog) {
    record_subject(event, log, "tracking_number");
}

pub fn tracking_deleted(event: &WebhookEvent<'_>, log: &dyn EventLog) {
    record_subject(event, log, "tracking_number");
}

/// Records the update, then the latest checkpoint when there is one
pub fn checkpoint_updated(event: &WebhookEvent<'_>, log: &dyn EventLog) {
    let Some(subject) = record_subject(event, log, "tracking_number") else {
        return;
    };

    let tracking = match Tracking::from_value(subject) {
        Ok(tracking) => tracking,
        Err(e) => {
            tracing::warn!(event = event.name(), error = %e, "unreadable tracking object");
            Tracking::default()
        }
    };

    match tracking.latest() {
        Some(checkpoint) => {
            let message = format!(
                "{} Latest checkpoint: {} at {}",
                event.version,
                checkpoint.status.as_deref().unwrap_or(UNKNOWN),
                checkpoint.location.as_deref().unwrap_or(UNKNOWN),
            );
            let data = serde_json::to_value(checkpoint).unwrap_or(Value::Null);
            log.record(&message, &data);
        }
        None => {
            let message = format!(
                "{} Checkpoint update for {}: no checkpoints",
                event.version,
                tracking.tracking_number.as_deref().unwrap_or(UNKNOWN),
            );
            log.record(&message, subject);
        }
    }
}

pub fn shipment_created(event: &WebhookEvent<'_>, log: &dyn EventLog) {
    record_subject(event, log, "order_number");
}

pub fn shipment_updated(event: &WebhookEvent<'_>, log: &dyn EventLog) {
    record_subject(event, log, "order_number");
}

pub fn shipment_deleted(event: &WebhookEvent<'_>, log: &dyn EventLog) {
    record_subject(event, log, "order_number");
}

pub fn shipment_cancelled(event: &WebhookEvent<'_>, log: &dyn EventLog) {
    record_subject(event, log, "order_number");
}

pub fn shipment_generated(event: &WebhookEvent<'_>, log: &dyn EventLog) {
    record_subject(event, log, "order_number");
}

/// Append `"<V> <action>: <key value>"` with the subject object.
///
/// Returns the subject, or `None` after logging that it is missing.
fn record_subject<'a>(
    event: &WebhookEvent<'a>,
    log: &dyn EventLog,
    key: &str,
) -> Option<&'a Value> {
    let Some(subject) = event.subject() else {
        let message = format!(
            "{} {}: missing {} object",
            event.version,
            event.event_type.action(),
            event.event_type.subject().key()
        );
        log.record(&message, event.payload);
        return None;
    };

    let id = subject.get_text(key).unwrap_or_else(|| UNKNOWN.to_string());
    let message = format!("{} {}: {}", event.version, event.event_type.action(), id);
    log.record(&message, subject);
    Some(subject)
}
