use serde::Serialize;
use std::collections::BTreeMap;
use tracing::*;

pub const LEFT_MOTOR_KEY: &str = "Motor (left)";
pub const RIGHT_MOTOR_KEY: &str = "Motor (right)";
pub const MAX_SPEED_KEY: &str = "Max speed";

/// One-way sink for named numeric values.
pub trait TelemetrySink {
    fn put_number(&mut self, key: &str, value: f64);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveTelemetry {
    pub left_motor: f32,
    pub right_motor: f32,
    pub max_speed: f32,
}

impl DriveTelemetry {
    pub fn publish(&self, sink: &mut dyn TelemetrySink) {
        sink.put_number(LEFT_MOTOR_KEY, self.left_motor as f64);
        sink.put_number(RIGHT_MOTOR_KEY, self.right_motor as f64);
        sink.put_number(MAX_SPEED_KEY, self.max_speed as f64);
    }
}

/// Writes every value to the log at debug level.
#[derive(Debug, Default)]
pub struct TracingTelemetry;

impl TelemetrySink for TracingTelemetry {
    fn put_number(&mut self, key: &str, value: f64) {
        debug!(key, value, "telemetry");
    }
}

/// Collects one tick worth of values so they can be shipped as a single message.
#[derive(Debug, Default, Serialize, Clone)]
pub struct TelemetryFrame {
    values: BTreeMap<String, f64>,
}

impl TelemetryFrame {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).cloned()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.values)
    }
}

impl TelemetrySink for TelemetryFrame {
    fn put_number(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_owned(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn publishes_all_three_keys() {
        let telemetry = DriveTelemetry {
            left_motor: 0.5,
            right_motor: -0.25,
            max_speed: 0.75,
        };
        let mut frame = TelemetryFrame::default();
        telemetry.publish(&mut frame);
        assert_relative_eq!(frame.get(LEFT_MOTOR_KEY).unwrap(), 0.5);
        assert_relative_eq!(frame.get(RIGHT_MOTOR_KEY).unwrap(), -0.25);
        assert_relative_eq!(frame.get(MAX_SPEED_KEY).unwrap(), 0.75);
    }

    #[test]
    fn frame_serializes_as_flat_map() {
        let mut frame = TelemetryFrame::default();
        frame.put_number(MAX_SPEED_KEY, 1.0);
        assert_eq!(frame.to_json().unwrap(), r#"{"Max speed":1.0}"#);
    }
}
