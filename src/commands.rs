//! Manual drive commands and the default command seam of the scheduler.

use crate::{
    drive_style::DriveStyle,
    drive_train::DriveTrain,
    driver::MotorOutput,
    gamepad::{Axis, OperatorAction, OperatorInput},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualDriveCommand {
    /// Left stick Y drives the left side, right stick Y the right side.
    TankDriveWithJoysticks,
    /// Left stick Y drives, left stick X turns.
    ArcadeDriveWithJoystick,
}

impl ManualDriveCommand {
    pub fn for_style(style: DriveStyle) -> Self {
        match style {
            DriveStyle::Tank => ManualDriveCommand::TankDriveWithJoysticks,
            DriveStyle::Arcade => ManualDriveCommand::ArcadeDriveWithJoystick,
        }
    }

    pub fn execute<M: MotorOutput>(&self, drive_train: &mut DriveTrain<M>, input: &OperatorInput) {
        match self {
            ManualDriveCommand::TankDriveWithJoysticks => drive_train
                .drive_tank(input.axis(Axis::LeftStickY), input.axis(Axis::RightStickY)),
            ManualDriveCommand::ArcadeDriveWithJoystick => drive_train
                .drive_arcade(input.axis(Axis::LeftStickY), input.axis(Axis::LeftStickX)),
        }
    }
}

/// The part of the command scheduler that manages a subsystem's idle behaviour.
pub trait DefaultCommandScheduler {
    fn set_default_command(&mut self, command: ManualDriveCommand);

    fn default_command(&self) -> Option<ManualDriveCommand>;
}

/// Holds the drive train's default command and runs it when nothing else claims the drive train.
#[derive(Debug, Default)]
pub struct DefaultCommandSlot {
    command: Option<ManualDriveCommand>,
    installs: usize,
}

impl DefaultCommandSlot {
    /// Number of times a default command was installed.
    pub fn installs(&self) -> usize {
        self.installs
    }

    /// Returns false when there is no default command to run.
    pub fn run_idle<M: MotorOutput>(
        &self,
        drive_train: &mut DriveTrain<M>,
        input: &OperatorInput,
    ) -> bool {
        match self.command {
            Some(command) => {
                command.execute(drive_train, input);
                true
            }
            None => false,
        }
    }
}

impl DefaultCommandScheduler for DefaultCommandSlot {
    fn set_default_command(&mut self, command: ManualDriveCommand) {
        self.command = Some(command);
        self.installs += 1;
    }

    fn default_command(&self) -> Option<ManualDriveCommand> {
        self.command
    }
}

/// Carry out a button-bound action. `StopAllMotors` is handled by the control loop as a hold.
pub fn apply_action<M: MotorOutput>(
    action: OperatorAction,
    max_speed_step: f32,
    drive_train: &mut DriveTrain<M>,
    scheduler: &mut dyn DefaultCommandScheduler,
) {
    match action {
        OperatorAction::ToggleDriveStyle => {
            drive_train.toggle_drive_style(scheduler);
        }
        OperatorAction::TankDrive => drive_train.set_drive_style(DriveStyle::Tank, scheduler),
        OperatorAction::ArcadeDrive => drive_train.set_drive_style(DriveStyle::Arcade, scheduler),
        OperatorAction::IncreaseMaxSpeed => drive_train.change_max_drive_speed(max_speed_step),
        OperatorAction::DecreaseMaxSpeed => drive_train.change_max_drive_speed(-max_speed_step),
        OperatorAction::StopAllMotors => drive_train.stop_all_motors(),
    }
}
