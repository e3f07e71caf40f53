use serde::Deserialize;

/// How arcade inputs are squeezed back into `[-1.0, 1.0]` once mixed.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ArcadeMixing {
    /// Clamp each side on its own. Turning authority is lost at full throttle.
    #[default]
    Clamp,
    /// Divide both sides by the larger magnitude when it exceeds 1.0,
    /// keeping the drive/turn ratio.
    Normalize,
}

/// Non-finite stick values are treated as centered.
fn sanitize(speed: f32) -> f32 {
    if speed.is_finite() {
        speed
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelCommand {
    left: f32,
    right: f32,
}

impl WheelCommand {
    pub fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    pub fn stopped() -> Self {
        Self::default()
    }

    pub fn from_tank(left_speed: f32, right_speed: f32, scale: f32) -> Self {
        Self::new(
            sanitize(left_speed).clamp(-1.0, 1.0) * scale,
            sanitize(right_speed).clamp(-1.0, 1.0) * scale,
        )
    }

    pub fn from_arcade(drive_speed: f32, turn_speed: f32, scale: f32, mixing: ArcadeMixing) -> Self {
        let (drive_speed, turn_speed) = (sanitize(drive_speed), sanitize(turn_speed));
        let left = drive_speed + turn_speed;
        let right = drive_speed - turn_speed;
        let (left, right) = match mixing {
            ArcadeMixing::Clamp => (left, right),
            ArcadeMixing::Normalize => {
                let magnitude = left.abs().max(right.abs());
                if magnitude > 1.0 {
                    (left / magnitude, right / magnitude)
                } else {
                    (left, right)
                }
            }
        };
        Self::new(
            left.clamp(-1.0, 1.0) * scale,
            right.clamp(-1.0, 1.0) * scale,
        )
    }

    pub fn left(&self) -> f32 {
        self.left
    }
    pub fn right(&self) -> f32 {
        self.right
    }
}
