use crate::{
    commands::{apply_action, DefaultCommandSlot},
    drive_train::DriveTrain,
    driver::MotorOutput,
    gamepad::{ButtonBindings, OperatorInput},
};
use tracing::*;

/// One pass of the manual drive control loop.
///
/// Owns the drive train for the lifetime of the loop so nothing else can
/// write its motors between ticks.
pub struct Teleop<M: MotorOutput> {
    drive_train: DriveTrain<M>,
    scheduler: DefaultCommandSlot,
    bindings: ButtonBindings,
    previous_input: OperatorInput,
}

impl<M: MotorOutput> Teleop<M> {
    pub fn new(drive_train: DriveTrain<M>, bindings: ButtonBindings) -> Self {
        let mut scheduler = DefaultCommandSlot::default();
        drive_train.init_default_command(&mut scheduler);
        Self {
            drive_train,
            scheduler,
            bindings,
            previous_input: OperatorInput::default(),
        }
    }

    pub fn tick(&mut self, input: &OperatorInput) {
        for action in self.bindings.pressed_actions(&self.previous_input, input) {
            debug!(?action, "Operator action");
            apply_action(
                action,
                self.bindings.max_speed_step,
                &mut self.drive_train,
                &mut self.scheduler,
            );
        }

        self.drive_train.check_throttle_for_change();

        if self.bindings.stop_held(input) || !input.is_connected() {
            self.drive_train.stop_all_motors();
        } else if !self.scheduler.run_idle(&mut self.drive_train, input) {
            self.drive_train.stop_all_motors();
        }

        self.previous_input = input.clone();
    }

    /// Zero both motors, used when the loop shuts down.
    pub fn stop(&mut self) {
        self.drive_train.stop_all_motors();
    }

    pub fn drive_train(&self) -> &DriveTrain<M> {
        &self.drive_train
    }

    pub fn scheduler(&self) -> &DefaultCommandSlot {
        &self.scheduler
    }
}
