use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AlertLevel, SwitchState};

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// One periodic sensor report from the device, capture-time stamped
/// server-side. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub sensor1: f64,
    pub sensor2: f64,
    pub alert1: AlertLevel,
    pub alert2: AlertLevel,
    pub actuator1: SwitchState,
    pub actuator2: SwitchState,
    pub captured_at: DateTime<Utc>,
}

impl Reading {
    /// True if either group reports a WARN or DANGER level. Only such
    /// readings are written to the durable alert log.
    pub fn has_alert(&self) -> bool {
        self.alert1.is_alert() || self.alert2.is_alert()
    }
}

// ---------------------------------------------------------------------------
// ReadingInput
// ---------------------------------------------------------------------------

/// The ingestion payload as posted by the device. Field presence and types
/// are enforced by deserialization; the capture timestamp is stamped by the
/// server, never trusted from the device.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadingInput {
    pub sensor1: f64,
    pub sensor2: f64,
    pub alert1: AlertLevel,
    pub alert2: AlertLevel,
    pub actuator1: SwitchState,
    pub actuator2: SwitchState,
}

impl ReadingInput {
    pub fn into_reading(self, captured_at: DateTime<Utc>) -> Reading {
        Reading {
            sensor1: self.sensor1,
            sensor2: self.sensor2,
            alert1: self.alert1,
            alert2: self.alert2,
            actuator1: self.actuator1,
            actuator2: self.actuator2,
            captured_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn input(alert1: AlertLevel, alert2: AlertLevel) -> ReadingInput {
        ReadingInput {
            sensor1: 120.0,
            sensor2: 340.5,
            alert1,
            alert2,
            actuator1: SwitchState::Off,
            actuator2: SwitchState::On,
        }
    }

    #[test]
    fn has_alert_when_either_group_is_not_safe() {
        let now = Utc::now();
        assert!(!input(AlertLevel::Safe, AlertLevel::Safe)
            .into_reading(now)
            .has_alert());
        assert!(input(AlertLevel::Warn, AlertLevel::Safe)
            .into_reading(now)
            .has_alert());
        assert!(input(AlertLevel::Safe, AlertLevel::Danger)
            .into_reading(now)
            .has_alert());
    }

    #[test]
    fn input_rejects_missing_fields() {
        let err = serde_json::from_str::<ReadingInput>(r#"{"sensor1": 1.0}"#);
        assert!(err.is_err());
    }

    #[test]
    fn input_rejects_wrong_types() {
        let payload = r#"{
            "sensor1": "not-a-number",
            "sensor2": 2.0,
            "alert1": "SAFE",
            "alert2": "SAFE",
            "actuator1": "OFF",
            "actuator2": "OFF"
        }"#;
        assert!(serde_json::from_str::<ReadingInput>(payload).is_err());
    }

    #[test]
    fn input_parses_full_payload() {
        let payload = r#"{
            "sensor1": 512.0,
            "sensor2": 48.0,
            "alert1": "DANGER",
            "alert2": "SAFE",
            "actuator1": "ON",
            "actuator2": "OFF"
        }"#;
        let parsed: ReadingInput = serde_json::from_str(payload).unwrap();
        assert_eq!(parsed.alert1, AlertLevel::Danger);
        assert_eq!(parsed.actuator1, SwitchState::On);
    }
}
