//! Event types and protocol versions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Webhook protocol version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtocolVersion {
    /// Single `event` object per delivery, underscore names
    V1,
    /// `events` array per delivery, slash names
    V2,
}

impl ProtocolVersion {
    /// Label used in event log messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::V1 => "V1",
            Self::V2 => "V2",
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The object an event is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    Tracking,
    Shipment,
}

impl Subject {
    /// Payload key holding the subject object
    pub fn key(&self) -> &'static str {
        match self {
            Self::Tracking => "tracking",
            Self::Shipment => "shipment",
        }
    }
}

/// Event types delivered by the tracking provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    TrackingCreated,
    TrackingUpdated,
    CheckpointUpdated,
    TrackingDeleted,
    ShipmentCreated,
    ShipmentUpdated,
    ShipmentDeleted,
    ShipmentCancelled,
    ShipmentGenerated,
}

impl EventType {
    /// Every event type, in subscription order
    pub const ALL: [EventType; 9] = [
        Self::TrackingCreated,
        Self::TrackingUpdated,
        Self::CheckpointUpdated,
        Self::TrackingDeleted,
        Self::ShipmentCreated,
        Self::ShipmentUpdated,
        Self::ShipmentDeleted,
        Self::ShipmentCancelled,
        Self::ShipmentGenerated,
    ];

    /// Wire name for the given protocol version
    pub fn name(&self, version: ProtocolVersion) -> &'static str {
        match version {
            ProtocolVersion::V1 => self.v1_name(),
            ProtocolVersion::V2 => self.v2_name(),
        }
    }

    /// Slash-delimited v2 name, e.g. `trackings/create`
    pub fn v2_name(&self) -> &'static str {
        match self {
            Self::TrackingCreated => "trackings/create",
            Self::TrackingUpdated => "trackings/update",
            Self::CheckpointUpdated => "trackings/checkpoint_update",
            Self::TrackingDeleted => "trackings/delete",
            Self::ShipmentCreated => "shipments/create",
            Self::ShipmentUpdated => "shipments/update",
            Self::ShipmentDeleted => "shipments/delete",
            Self::ShipmentCancelled => "shipments/cancel",
            Self::ShipmentGenerated => "shipments/generated",
        }
    }

    /// Underscore-delimited v1 name, e.g. `tracking_create`
    pub fn v1_name(&self) -> &'static str {
        match self {
            Self::TrackingCreated => "tracking_create",
            Self::TrackingUpdated => "tracking_update",
            Self::CheckpointUpdated => "tracking_checkpoint_update",
            Self::TrackingDeleted => "tracking_delete",
            Self::ShipmentCreated => "shipment_create",
            Self::ShipmentUpdated => "shipment_update",
            Self::ShipmentDeleted => "shipment_delete",
            Self::ShipmentCancelled => "shipment_cancel",
            Self::ShipmentGenerated => "shipment_generated",
        }
    }

    /// Look up a wire name in either protocol version
    pub fn parse(name: &str) -> Option<(ProtocolVersion, EventType)> {
        Self::ALL.iter().find_map(|event| {
            if event.v2_name() == name {
                Some((ProtocolVersion::V2, *event))
            } else if event.v1_name() == name {
                Some((ProtocolVersion::V1, *event))
            } else {
                None
            }
        })
    }

    /// Object the event carries
    pub fn subject(&self) -> Subject {
        match self {
            Self::TrackingCreated
            | Self::TrackingUpdated
            | Self::CheckpointUpdated
            | Self::TrackingDeleted => Subject::Tracking,
            _ => Subject::Shipment,
        }
    }

    /// Action phrase used in event log messages
    pub fn action(&self) -> &'static str {
        match self {
            Self::TrackingCreated => "Tracking created",
            Self::TrackingUpdated => "Tracking updated",
            Self::CheckpointUpdated => "Checkpoint updated",
            Self::TrackingDeleted => "Tracking deleted",
            Self::ShipmentCreated => "Shipment created",
            Self::ShipmentUpdated => "Shipment updated",
            Self::ShipmentDeleted => "Shipment deleted",
            Self::ShipmentCancelled => "Shipment cancelled",
            Self::ShipmentGenerated => "Shipment generated",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.v2_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<&str> = EventType::ALL
            .iter()
            .flat_map(|e| [e.v1_name(), e.v2_name()])
            .collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 18);
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            EventType::parse("trackings/checkpoint_update"),
            Some((ProtocolVersion::V2, EventType::CheckpointUpdated))
        );
        assert_eq!(
            EventType::parse("shipment_cancel"),
            Some((ProtocolVersion::V1, EventType::ShipmentCancelled))
        );
        assert_eq!(EventType::parse("trackings/teleport"), None);
        assert_eq!(EventType::parse(""), None);
    }

    #[test]
    fn test_subject_follows_prefix() {
        for event in EventType::ALL {
            let expected = if event.v2_name().starts_with("trackings/") {
                Subject::Tracking
            } else {
                Subject::Shipment
            };
            assert_eq!(event.subject(), expected);
            assert!(event.v1_name().starts_with(expected.key()));
        }
    }
}
