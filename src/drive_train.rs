//! The drive train subsystem.
//!
//! Owns both drive motors, the speed governor and the drive style selector.
//! Manual drive commands call into it once per control tick.

use crate::{
    commands::{DefaultCommandScheduler, ManualDriveCommand},
    differential_drive::{ArcadeMixing, WheelCommand},
    drive_style::{DriveStyle, DriveStyleSelector},
    driver::{validate_motor_configs, MotorConfig, MotorOutput},
    error::DriveTrainError,
    governor::{SpeedGovernor, Throttle},
    telemetry::{DriveTelemetry, TelemetrySink},
};
use serde::Deserialize;
use std::time::Duration;
use tracing::*;

fn default_max_speed() -> f32 {
    1.0
}

fn default_loop_rate() -> f32 {
    50.0
}

#[derive(Deserialize, Debug, Clone)]
pub struct DriveConfig {
    pub left_motor: MotorConfig,
    pub right_motor: MotorConfig,
    #[serde(default = "default_max_speed")]
    pub initial_max_speed: f32,
    #[serde(default)]
    pub arcade_mixing: ArcadeMixing,
    #[serde(default)]
    pub drive_style: DriveStyle,
    /// Control loop frequency in Hz.
    #[serde(default = "default_loop_rate")]
    pub loop_rate: f32,
}

impl DriveConfig {
    pub fn validate(&self) -> Result<(), DriveTrainError> {
        validate_motor_configs(&self.left_motor, &self.right_motor)?;
        self.tick_period()?;
        Ok(())
    }

    pub fn tick_period(&self) -> Result<Duration, DriveTrainError> {
        if !(self.loop_rate.is_finite() && self.loop_rate > 0.0) {
            return Err(DriveTrainError::InvalidLoopRate);
        }
        Duration::try_from_secs_f64(1.0 / self.loop_rate as f64)
            .map_err(|_| DriveTrainError::InvalidLoopRate)
    }
}

pub struct DriveTrain<M: MotorOutput> {
    left_motor: M,
    right_motor: M,
    governor: SpeedGovernor,
    throttle: Option<Box<dyn Throttle>>,
    selector: DriveStyleSelector,
    mixing: ArcadeMixing,
}

impl<M: MotorOutput> DriveTrain<M> {
    pub fn new(left_motor: M, right_motor: M, governor: SpeedGovernor) -> Self {
        Self {
            left_motor,
            right_motor,
            governor,
            throttle: None,
            selector: DriveStyleSelector::new(DriveStyle::default()),
            mixing: ArcadeMixing::default(),
        }
    }

    pub fn from_config(
        config: &DriveConfig,
        left_motor: M,
        right_motor: M,
    ) -> Result<Self, DriveTrainError> {
        config.validate()?;
        Ok(
            Self::new(left_motor, right_motor, SpeedGovernor::new(config.initial_max_speed))
                .with_arcade_mixing(config.arcade_mixing)
                .with_drive_style(config.drive_style),
        )
    }

    pub fn with_throttle(mut self, throttle: Box<dyn Throttle>) -> Self {
        self.throttle = Some(throttle);
        self
    }

    pub fn with_arcade_mixing(mut self, mixing: ArcadeMixing) -> Self {
        self.mixing = mixing;
        self
    }

    pub fn with_drive_style(mut self, style: DriveStyle) -> Self {
        self.selector.set_style(style);
        self
    }

    /// Drive each side independently, speeds from -1.0 to 1.0.
    pub fn drive_tank(&mut self, left_speed: f32, right_speed: f32) {
        let command =
            WheelCommand::from_tank(left_speed, right_speed, self.governor.current_max_speed());
        self.write(command);
    }

    /// Drive with a forward speed and a turn rate, both from -1.0 to 1.0.
    pub fn drive_arcade(&mut self, drive_speed: f32, turn_speed: f32) {
        let command = WheelCommand::from_arcade(
            drive_speed,
            turn_speed,
            self.governor.current_max_speed(),
            self.mixing,
        );
        self.write(command);
    }

    /// Drive forward or backward without turning.
    pub fn drive_straight(&mut self, speed: f32) {
        self.drive_tank(speed, speed);
    }

    /// Writes zero to both motors, ignoring the governor.
    pub fn stop_all_motors(&mut self) {
        self.write(WheelCommand::stopped());
    }

    fn write(&mut self, command: WheelCommand) {
        self.left_motor.set(command.left());
        self.right_motor.set(command.right());
    }

    pub fn change_max_drive_speed(&mut self, delta: f32) {
        self.governor.change_max_speed(delta);
    }

    pub fn set_max_drive_speed(&mut self, max_speed: f32) {
        self.governor.set_max_speed(max_speed);
    }

    pub fn max_drive_speed(&self) -> f32 {
        self.governor.current_max_speed()
    }

    pub fn has_throttle(&self) -> bool {
        self.throttle.is_some()
    }

    /// Call every tick before driving so a throttle move applies on the same tick.
    pub fn check_throttle_for_change(&mut self) {
        if let Some(throttle) = self.throttle.as_deref_mut() {
            self.governor.poll_throttle(throttle);
        }
    }

    pub fn drive_style(&self) -> DriveStyle {
        self.selector.style()
    }

    /// Install the command matching the current drive style as the idle behaviour.
    pub fn init_default_command(&self, scheduler: &mut dyn DefaultCommandScheduler) {
        scheduler.set_default_command(ManualDriveCommand::for_style(self.selector.style()));
    }

    pub fn toggle_drive_style(&mut self, scheduler: &mut dyn DefaultCommandScheduler) -> DriveStyle {
        let style = self.selector.toggle();
        info!("Switching drive style to {}", style);
        self.init_default_command(scheduler);
        style
    }

    pub fn set_drive_style(&mut self, style: DriveStyle, scheduler: &mut dyn DefaultCommandScheduler) {
        self.selector.set_style(style);
        info!("Setting drive style to {}", style);
        self.init_default_command(scheduler);
    }

    pub fn current_left_speed(&self) -> f32 {
        self.left_motor.get()
    }

    pub fn current_right_speed(&self) -> f32 {
        self.right_motor.get()
    }

    pub fn left_motor(&self) -> &M {
        &self.left_motor
    }

    pub fn right_motor(&self) -> &M {
        &self.right_motor
    }

    pub fn telemetry(&self) -> DriveTelemetry {
        DriveTelemetry {
            left_motor: self.current_left_speed(),
            right_motor: self.current_right_speed(),
            max_speed: self.max_drive_speed(),
        }
    }

    pub fn publish_telemetry(&self, sink: &mut dyn TelemetrySink) {
        self.telemetry().publish(sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{commands::DefaultCommandSlot, driver::SimulatedMotor, telemetry::TelemetryFrame};
    use approx::assert_relative_eq;
    use std::sync::{Arc, Mutex};

    fn drive_train() -> DriveTrain<SimulatedMotor> {
        DriveTrain::new(
            SimulatedMotor::new(false),
            SimulatedMotor::new(true),
            SpeedGovernor::default(),
        )
    }

    struct SharedThrottle {
        reading: Arc<Mutex<f32>>,
        last: Option<f32>,
    }

    impl Throttle for SharedThrottle {
        fn has_changed(&mut self) -> bool {
            let reading = self.current_speed();
            if self.last == Some(reading) {
                false
            } else {
                self.last = Some(reading);
                true
            }
        }

        fn current_speed(&self) -> f32 {
            *self.reading.lock().unwrap()
        }
    }

    #[test]
    fn tank_identity() {
        let mut drive_train = drive_train();
        drive_train.drive_tank(0.6, 0.6);
        assert_relative_eq!(drive_train.current_left_speed(), 0.6);
        assert_relative_eq!(drive_train.current_right_speed(), 0.6);
    }

    #[test]
    fn readback_is_before_inversion() {
        let mut drive_train = drive_train();
        drive_train.drive_tank(0.2, 0.4);
        assert_relative_eq!(drive_train.current_right_speed(), 0.4);
        assert_relative_eq!(drive_train.right_motor().applied(), -0.4);
        assert_relative_eq!(drive_train.left_motor().applied(), 0.2);
    }

    #[test]
    fn arcade_example_uses_clamp_mixing() {
        let mut drive_train = drive_train();
        drive_train.drive_arcade(0.8, -0.3);
        assert_relative_eq!(drive_train.current_left_speed(), 0.5, epsilon = 1e-6);
        assert_relative_eq!(drive_train.current_right_speed(), 1.0);
    }

    #[test]
    fn arcade_follows_configured_mixing() {
        let mut drive_train = drive_train().with_arcade_mixing(ArcadeMixing::Normalize);
        drive_train.drive_arcade(1.0, 1.0);
        assert_relative_eq!(drive_train.current_left_speed(), 1.0);
        assert_relative_eq!(drive_train.current_right_speed(), 0.0);
    }

    #[test]
    fn outputs_follow_max_speed() {
        let mut drive_train = drive_train();
        drive_train.set_max_drive_speed(0.5);
        drive_train.drive_arcade(0.0, 0.8);
        assert_relative_eq!(drive_train.current_left_speed(), 0.4);
        assert_relative_eq!(drive_train.current_right_speed(), -0.4);
        drive_train.drive_straight(-1.0);
        assert_relative_eq!(drive_train.current_left_speed(), -0.5);
    }

    #[test]
    fn zero_max_speed_holds_still() {
        let mut drive_train = drive_train();
        drive_train.change_max_drive_speed(-5.0);
        drive_train.drive_tank(1.0, -1.0);
        assert_relative_eq!(drive_train.current_left_speed(), 0.0);
        assert_relative_eq!(drive_train.current_right_speed(), 0.0);
    }

    #[test]
    fn stop_all_motors_always_zeroes() {
        let mut drive_train = drive_train();
        drive_train.drive_tank(1.0, -1.0);
        drive_train.stop_all_motors();
        assert_relative_eq!(drive_train.current_left_speed(), 0.0);
        assert_relative_eq!(drive_train.current_right_speed(), 0.0);

        drive_train.set_max_drive_speed(0.0);
        drive_train.stop_all_motors();
        assert_relative_eq!(drive_train.current_left_speed(), 0.0);
        assert_eq!(drive_train.left_motor().writes(), 3);
    }

    #[test]
    fn no_throttle_is_a_no_op() {
        let mut drive_train = drive_train();
        drive_train.set_max_drive_speed(0.3);
        drive_train.check_throttle_for_change();
        assert!(!drive_train.has_throttle());
        assert_relative_eq!(drive_train.max_drive_speed(), 0.3);
    }

    #[test]
    fn throttle_applies_on_same_tick() {
        let reading = Arc::new(Mutex::new(0.25));
        let mut drive_train = drive_train().with_throttle(Box::new(SharedThrottle {
            reading: reading.clone(),
            last: None,
        }));
        drive_train.check_throttle_for_change();
        drive_train.drive_straight(1.0);
        assert_relative_eq!(drive_train.current_left_speed(), 0.25);

        drive_train.set_max_drive_speed(0.9);
        drive_train.check_throttle_for_change();
        assert_relative_eq!(drive_train.max_drive_speed(), 0.9);

        *reading.lock().unwrap() = 0.5;
        drive_train.check_throttle_for_change();
        drive_train.check_throttle_for_change();
        assert_relative_eq!(drive_train.max_drive_speed(), 0.5);
    }

    #[test]
    fn toggle_reinstalls_default_command_once() {
        let mut drive_train = drive_train();
        let mut scheduler = DefaultCommandSlot::default();
        drive_train.init_default_command(&mut scheduler);
        assert_eq!(
            scheduler.default_command(),
            Some(ManualDriveCommand::TankDriveWithJoysticks)
        );

        assert_eq!(drive_train.toggle_drive_style(&mut scheduler), DriveStyle::Arcade);
        assert_eq!(scheduler.installs(), 2);
        assert_eq!(
            scheduler.default_command(),
            Some(ManualDriveCommand::ArcadeDriveWithJoystick)
        );

        assert_eq!(drive_train.toggle_drive_style(&mut scheduler), DriveStyle::Tank);
        assert_eq!(scheduler.installs(), 3);
        assert_eq!(
            scheduler.default_command(),
            Some(ManualDriveCommand::TankDriveWithJoysticks)
        );
    }

    #[test]
    fn set_drive_style_explicitly() {
        let mut drive_train = drive_train();
        let mut scheduler = DefaultCommandSlot::default();
        drive_train.set_drive_style(DriveStyle::Arcade, &mut scheduler);
        drive_train.set_drive_style(DriveStyle::Arcade, &mut scheduler);
        assert_eq!(drive_train.drive_style(), DriveStyle::Arcade);
        assert_eq!(scheduler.installs(), 2);
    }

    #[test]
    fn telemetry_reports_last_written_values() {
        let mut drive_train = drive_train();
        drive_train.set_max_drive_speed(0.5);
        drive_train.drive_tank(1.0, 0.5);
        let mut frame = TelemetryFrame::default();
        drive_train.publish_telemetry(&mut frame);
        assert_relative_eq!(frame.get("Motor (left)").unwrap(), 0.5);
        assert_relative_eq!(frame.get("Motor (right)").unwrap(), 0.25);
        assert_relative_eq!(frame.get("Max speed").unwrap(), 0.5);
    }

    fn config(left_channel: usize, right_channel: usize, loop_rate: f32) -> DriveConfig {
        DriveConfig {
            left_motor: MotorConfig {
                channel: left_channel,
                inverted: false,
            },
            right_motor: MotorConfig {
                channel: right_channel,
                inverted: true,
            },
            initial_max_speed: 0.6,
            arcade_mixing: ArcadeMixing::Clamp,
            drive_style: DriveStyle::Arcade,
            loop_rate,
        }
    }

    #[test]
    fn from_config_applies_settings() {
        let drive_train = DriveTrain::from_config(
            &config(0, 1, 50.0),
            SimulatedMotor::new(false),
            SimulatedMotor::new(true),
        )
        .unwrap();
        assert_relative_eq!(drive_train.max_drive_speed(), 0.6);
        assert_eq!(drive_train.drive_style(), DriveStyle::Arcade);
    }

    #[test]
    fn from_config_fails_fast_on_bad_wiring() {
        let result = DriveTrain::from_config(
            &config(1, 1, 50.0),
            SimulatedMotor::new(false),
            SimulatedMotor::new(true),
        );
        assert!(matches!(result, Err(DriveTrainError::SharedMotorChannel(1))));
    }

    #[test]
    fn zero_loop_rate_is_rejected() {
        assert_eq!(
            config(0, 1, 0.0).tick_period(),
            Err(DriveTrainError::InvalidLoopRate)
        );
        assert_eq!(
            config(0, 1, 1e-30).tick_period(),
            Err(DriveTrainError::InvalidLoopRate)
        );
        assert_eq!(
            config(0, 1, 1e-30).validate(),
            Err(DriveTrainError::InvalidLoopRate)
        );
        assert_eq!(
            config(0, 1, 50.0).tick_period(),
            Ok(Duration::from_millis(20))
        );
    }

    #[test]
    fn nan_drive_input_stops_the_motors() {
        let mut drive_train = drive_train();
        drive_train.drive_tank(1.0, 1.0);
        drive_train.drive_tank(f32::NAN, f32::NAN);
        assert_relative_eq!(drive_train.current_left_speed(), 0.0);
        assert_relative_eq!(drive_train.current_right_speed(), 0.0);
        drive_train.drive_arcade(f32::NAN, f32::NAN);
        assert_relative_eq!(drive_train.current_left_speed(), 0.0);
        assert_relative_eq!(drive_train.right_motor().applied(), 0.0);
    }
}
