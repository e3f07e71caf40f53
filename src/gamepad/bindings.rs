use super::{input::OperatorInput, messages::Button};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum OperatorAction {
    ToggleDriveStyle,
    TankDrive,
    ArcadeDrive,
    IncreaseMaxSpeed,
    DecreaseMaxSpeed,
    /// Held rather than pressed. Motors stay stopped while the button is down.
    StopAllMotors,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ButtonBinding {
    pub button: Button,
    pub action: OperatorAction,
}

fn default_max_speed_step() -> f32 {
    0.1
}

fn default_buttons() -> Vec<ButtonBinding> {
    vec![
        ButtonBinding {
            button: Button::South,
            action: OperatorAction::ToggleDriveStyle,
        },
        ButtonBinding {
            button: Button::North,
            action: OperatorAction::TankDrive,
        },
        ButtonBinding {
            button: Button::West,
            action: OperatorAction::ArcadeDrive,
        },
        ButtonBinding {
            button: Button::DPadUp,
            action: OperatorAction::IncreaseMaxSpeed,
        },
        ButtonBinding {
            button: Button::DPadDown,
            action: OperatorAction::DecreaseMaxSpeed,
        },
        ButtonBinding {
            button: Button::East,
            action: OperatorAction::StopAllMotors,
        },
    ]
}

/// Static wiring of gamepad buttons to operator actions.
#[derive(Deserialize, Debug, Clone)]
pub struct ButtonBindings {
    #[serde(default = "default_max_speed_step")]
    pub max_speed_step: f32,
    #[serde(default = "default_buttons")]
    pub buttons: Vec<ButtonBinding>,
}

impl Default for ButtonBindings {
    fn default() -> Self {
        Self {
            max_speed_step: default_max_speed_step(),
            buttons: default_buttons(),
        }
    }
}

impl ButtonBindings {
    /// Actions whose button was pressed between `previous` and `current`, in binding order.
    ///
    /// Hold actions are never reported here, see [`ButtonBindings::stop_held`].
    pub fn pressed_actions(
        &self,
        previous: &OperatorInput,
        current: &OperatorInput,
    ) -> Vec<OperatorAction> {
        self.buttons
            .iter()
            .filter(|binding| binding.action != OperatorAction::StopAllMotors)
            .filter(|binding| current.pressed_since(previous, binding.button))
            .map(|binding| binding.action)
            .collect()
    }

    pub fn stop_held(&self, current: &OperatorInput) -> bool {
        self.buttons
            .iter()
            .filter(|binding| binding.action == OperatorAction::StopAllMotors)
            .any(|binding| current.button_down(binding.button))
    }
}
