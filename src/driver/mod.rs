mod serial_bus;
mod simulated;

pub use serial_bus::{SerialMotorBus, WireMoveCommand};
pub use simulated::{SimulatedMotor, SimulatedMotorBus};

use crate::error::DriveTrainError;
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};
use tracing::*;

/// Number of output channels on the motor controller.
pub const MOTOR_CHANNELS: usize = 2;

/// Normalized actuation primitive for one side of the drive train.
///
/// `set` takes a value in `[-1.0, 1.0]` before inversion. Implementations are
/// responsible for flipping the sign of what reaches the hardware when the
/// motor is mounted inverted.
pub trait MotorOutput {
    fn set(&mut self, value: f32);

    /// Last value passed to `set`, before inversion.
    fn get(&self) -> f32;

    fn inverted(&self) -> bool;

    /// Value that actually reaches the actuator.
    fn applied(&self) -> f32 {
        if self.inverted() {
            -self.get()
        } else {
            self.get()
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct MotorConfig {
    pub channel: usize,
    #[serde(default)]
    pub inverted: bool,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MotorBusConfig {
    Serial { port: String },
    Simulated,
}

/// Pushes the latest motor frame to the hardware once per control tick.
#[async_trait]
pub trait MotorBus: Send {
    async fn flush(&mut self) -> Result<()>;
}

/// Applied outputs of every channel, shared between the motors and their bus.
#[derive(Debug, Clone, Default)]
pub struct MotorFrame {
    channels: Arc<[AtomicU32; MOTOR_CHANNELS]>,
}

impl MotorFrame {
    fn store(&self, channel: usize, value: f32) {
        self.channels[channel].store(value.to_bits(), Ordering::Relaxed);
    }

    pub fn load(&self) -> [f32; MOTOR_CHANNELS] {
        [
            f32::from_bits(self.channels[0].load(Ordering::Relaxed)),
            f32::from_bits(self.channels[1].load(Ordering::Relaxed)),
        ]
    }

    pub fn wire_command(&self) -> WireMoveCommand {
        let [wheel_a, wheel_b] = self.load();
        WireMoveCommand::new(wheel_a, wheel_b)
    }
}

/// Motor whose output is written into a [`MotorFrame`] slot.
#[derive(Debug)]
pub struct BusMotor {
    config: MotorConfig,
    value: f32,
    frame: MotorFrame,
}

impl BusMotor {
    fn new(config: MotorConfig, frame: MotorFrame) -> Self {
        Self {
            config,
            value: 0.0,
            frame,
        }
    }
}

impl MotorOutput for BusMotor {
    fn set(&mut self, value: f32) {
        self.value = value;
        self.frame.store(self.config.channel, self.applied());
    }

    fn get(&self) -> f32 {
        self.value
    }

    fn inverted(&self) -> bool {
        self.config.inverted
    }
}

/// Check that the two sides can be wired to the controller.
pub fn validate_motor_configs(left: &MotorConfig, right: &MotorConfig) -> Result<(), DriveTrainError> {
    for config in [left, right] {
        if config.channel >= MOTOR_CHANNELS {
            return Err(DriveTrainError::MotorChannelOutOfRange(config.channel));
        }
    }
    if left.channel == right.channel {
        return Err(DriveTrainError::SharedMotorChannel(left.channel));
    }
    Ok(())
}

pub async fn motor_bus_from_config(
    bus_config: &MotorBusConfig,
    left: MotorConfig,
    right: MotorConfig,
) -> Result<(Box<dyn MotorBus>, BusMotor, BusMotor)> {
    validate_motor_configs(&left, &right)?;
    let frame = MotorFrame::default();
    let bus: Box<dyn MotorBus> = match bus_config {
        MotorBusConfig::Serial { port } => {
            info!("Opening motor controller on {}", port);
            Box::new(SerialMotorBus::new(port, frame.clone())?)
        }
        MotorBusConfig::Simulated => {
            warn!("Using simulated motor bus");
            Box::new(SimulatedMotorBus::new(frame.clone()))
        }
    };
    Ok((
        bus,
        BusMotor::new(left, frame.clone()),
        BusMotor::new(right, frame),
    ))
}
