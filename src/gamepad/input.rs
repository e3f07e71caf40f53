use super::messages::{Axis, Button, GamepadMessage};
use std::collections::BTreeMap;

const DEADZONE: f32 = 0.07;

fn apply_deadzone(value: f32) -> f32 {
    if value.abs() < DEADZONE {
        0.0
    } else {
        value
    }
}

/// Snapshot of the operator's controls for one control tick.
///
/// The default value is a neutral, disconnected controller: sticks centered,
/// nothing held.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperatorInput {
    connected: bool,
    axes: BTreeMap<Axis, f32>,
    buttons_down: BTreeMap<Button, bool>,
    button_presses: BTreeMap<Button, usize>,
}

impl OperatorInput {
    /// Neutral input from a connected controller.
    pub fn connected() -> Self {
        Self {
            connected: true,
            ..Default::default()
        }
    }

    pub fn from_gamepad(gamepad: &GamepadMessage) -> Self {
        if !gamepad.connected {
            return Self::default();
        }
        Self {
            connected: true,
            axes: gamepad.axis_state.clone(),
            buttons_down: gamepad.button_down.clone(),
            button_presses: gamepad.button_down_event_counter.clone(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn with_axis(mut self, axis: Axis, value: f32) -> Self {
        self.axes.insert(axis, value);
        self
    }

    pub fn with_button_down(mut self, button: Button, down: bool) -> Self {
        self.buttons_down.insert(button, down);
        self
    }

    /// Registers one more press of `button`.
    pub fn with_button_press(mut self, button: Button) -> Self {
        *self.button_presses.entry(button).or_default() += 1;
        self
    }

    /// Stick position with the deadzone applied, clamped into `[-1.0, 1.0]`.
    pub fn axis(&self, axis: Axis) -> f32 {
        apply_deadzone(self.raw_axis(axis))
    }

    pub fn raw_axis(&self, axis: Axis) -> f32 {
        self.axes
            .get(&axis)
            .cloned()
            .filter(|value| value.is_finite())
            .unwrap_or_default()
            .clamp(-1.0, 1.0)
    }

    pub fn button_down(&self, button: Button) -> bool {
        self.buttons_down.get(&button).cloned().unwrap_or_default()
    }

    pub fn presses(&self, button: Button) -> usize {
        self.button_presses.get(&button).cloned().unwrap_or_default()
    }

    /// Whether `button` was pressed after `previous` was taken.
    ///
    /// Counters are only compared between two connected snapshots, so a
    /// controller coming back does not replay its old presses.
    pub fn pressed_since(&self, previous: &OperatorInput, button: Button) -> bool {
        self.connected && previous.connected && self.presses(button) > previous.presses(button)
    }
}
