use super::{input::OperatorInput, messages::Axis};
use crate::governor::Throttle;
use serde::Deserialize;
use tokio::sync::watch;

fn default_tolerance() -> f32 {
    0.02
}

#[derive(Deserialize, Debug, Clone)]
pub struct ThrottleConfig {
    pub axis: Axis,
    /// Full speed when the axis is pushed to -1.0 instead of 1.0.
    #[serde(default)]
    pub reversed: bool,
    /// Smallest movement reported as a change.
    #[serde(default = "default_tolerance")]
    pub tolerance: f32,
}

/// Throttle backed by one gamepad axis.
pub struct AxisThrottle {
    input: watch::Receiver<OperatorInput>,
    config: ThrottleConfig,
    last_reported: Option<f32>,
}

impl AxisThrottle {
    pub fn new(input: watch::Receiver<OperatorInput>, config: ThrottleConfig) -> Self {
        Self {
            input,
            config,
            last_reported: None,
        }
    }

    /// Nothing to read while the controller is away.
    fn read(&self) -> Option<f32> {
        let input = self.input.borrow();
        if !input.is_connected() {
            return None;
        }
        let raw = input.raw_axis(self.config.axis);
        let raw = if self.config.reversed { -raw } else { raw };
        Some(((raw + 1.0) / 2.0).clamp(0.0, 1.0))
    }
}

impl Throttle for AxisThrottle {
    fn has_changed(&mut self) -> bool {
        let Some(current) = self.read() else {
            return false;
        };
        match self.last_reported {
            Some(last) if (current - last).abs() <= self.config.tolerance => false,
            _ => {
                self.last_reported = Some(current);
                true
            }
        }
    }

    fn current_speed(&self) -> f32 {
        self.last_reported
            .or_else(|| self.read())
            .unwrap_or_default()
    }
}
