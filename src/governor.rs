use tracing::*;

const MAX_SPEED_FACTOR: f32 = 1.0;
const MIN_SPEED_FACTOR: f32 = 0.0;

/// Physical control whose position sets the maximum drive speed.
pub trait Throttle: Send {
    /// Whether the reading moved since the last time this was asked.
    fn has_changed(&mut self) -> bool;

    /// Current reading in `[0.0, 1.0]`.
    fn current_speed(&self) -> f32;
}

/// Owns the maximum output magnitude applied to every drive command.
#[derive(Debug, Clone)]
pub struct SpeedGovernor {
    speed_factor: f32,
}

impl Default for SpeedGovernor {
    fn default() -> Self {
        Self {
            speed_factor: MAX_SPEED_FACTOR,
        }
    }
}

impl SpeedGovernor {
    pub fn new(initial_max_speed: f32) -> Self {
        let mut governor = Self::default();
        governor.set_max_speed(initial_max_speed);
        governor
    }

    /// Out of range values are clamped into `[0.0, 1.0]`. NaN is treated as a full stop.
    pub fn set_max_speed(&mut self, requested: f32) {
        let new_speed = if requested.is_nan() {
            MIN_SPEED_FACTOR
        } else {
            requested.clamp(MIN_SPEED_FACTOR, MAX_SPEED_FACTOR)
        };
        if new_speed != self.speed_factor {
            info!("Setting max drive speed to {}", new_speed);
        }
        self.speed_factor = new_speed;
    }

    /// Safe for any delta, the result is clamped like [`SpeedGovernor::set_max_speed`].
    pub fn change_max_speed(&mut self, delta: f32) {
        self.set_max_speed(self.speed_factor + delta);
    }

    pub fn current_max_speed(&self) -> f32 {
        self.speed_factor
    }

    pub fn poll_throttle(&mut self, throttle: &mut dyn Throttle) {
        if throttle.has_changed() {
            // the throttle has been moved, so follow it
            self.set_max_speed(throttle.current_speed());
        }
    }
}
