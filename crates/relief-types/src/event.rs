//! Hazard event payload exchanged between the event source and agents.
//!
//! Events travel through the transit queue as raw JSON objects. Producers
//! serialize a [`HazardEvent`]; consumers decode with
//! [`HazardEvent::from_value`], which treats all five keys as required.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::HazardType;

/// Errors raised while decoding a raw event payload.
#[derive(Debug, thiserror::Error)]
pub enum EventDecodeError {
    /// A required key is missing or holds a value of the wrong type.
    #[error("malformed hazard event: {source}")]
    Malformed {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

/// A timestamped hazard occurrence.
///
/// Severity is nominally `1..=5` (1 minor, 5 catastrophic) but is not
/// bound-checked; consumers compare it as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardEvent {
    /// Unique event identifier.
    pub id: String,

    /// Hazard category (`"type"` on the wire).
    #[serde(rename = "type")]
    pub hazard_type: HazardType,

    /// Severity level.
    pub severity: i64,

    /// Name of the affected location.
    pub location: String,

    /// Seconds since the Unix epoch when the event was generated.
    pub timestamp: f64,
}

impl HazardEvent {
    /// Create an event with a fresh UUID v4 identifier.
    pub fn new(
        hazard_type: HazardType,
        severity: i64,
        location: impl Into<String>,
        timestamp: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            hazard_type,
            severity,
            location: location.into(),
            timestamp,
        }
    }

    /// Decode an event from a raw JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`EventDecodeError::Malformed`] if any of `id`, `type`,
    /// `severity`, `location` or `timestamp` is missing or mistyped.
    pub fn from_value(payload: serde_json::Value) -> Result<Self, EventDecodeError> {
        Ok(serde_json::from_value(payload)?)
    }

    /// Encode this event as a raw JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`EventDecodeError::Malformed`] if serialization fails.
    pub fn to_value(&self) -> Result<serde_json::Value, EventDecodeError> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn payload() -> serde_json::Value {
        json!({
            "id": "evt-1",
            "type": "flood",
            "severity": 4,
            "location": "Madina",
            "timestamp": 1_700_000_000.5,
        })
    }

    #[test]
    fn decodes_complete_payload() {
        let event = HazardEvent::from_value(payload()).unwrap();
        assert_eq!(event.id, "evt-1");
        assert_eq!(event.hazard_type, HazardType::Flood);
        assert_eq!(event.severity, 4);
        assert_eq!(event.location, "Madina");
    }

    #[test]
    fn every_key_is_required() {
        for key in ["id", "type", "severity", "location", "timestamp"] {
            let mut raw = payload();
            raw.as_object_mut().unwrap().remove(key);
            let result = HazardEvent::from_value(raw);
            assert!(result.is_err(), "payload without `{key}` must be rejected");
        }
    }

    #[test]
    fn mistyped_severity_is_rejected() {
        let mut raw = payload();
        raw["severity"] = json!("high");
        assert!(HazardEvent::from_value(raw).is_err());
    }

    #[test]
    fn unknown_hazard_is_rejected() {
        let mut raw = payload();
        raw["type"] = json!("meteor");
        assert!(HazardEvent::from_value(raw).is_err());
    }

    #[test]
    fn out_of_range_severity_is_accepted() {
        let mut raw = payload();
        raw["severity"] = json!(42);
        let event = HazardEvent::from_value(raw).unwrap();
        assert_eq!(event.severity, 42);
    }

    #[test]
    fn encoded_payload_uses_type_key() {
        let event = HazardEvent::new(HazardType::Fire, 2, "Nima", 10.0);
        let raw = event.to_value().unwrap();
        assert_eq!(raw["type"], json!("fire"));
        assert_eq!(HazardEvent::from_value(raw).unwrap(), event);
    }
}
