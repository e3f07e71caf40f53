use super::{MotorBus, MotorFrame, MotorOutput};
use anyhow::Result;
use async_trait::async_trait;
use tracing::*;

/// In-memory motor, useful on the bench and in tests.
#[derive(Debug, Default, Clone)]
pub struct SimulatedMotor {
    value: f32,
    inverted: bool,
    writes: usize,
}

impl SimulatedMotor {
    pub fn new(inverted: bool) -> Self {
        Self {
            inverted,
            ..Default::default()
        }
    }

    /// Number of times `set` was called.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl MotorOutput for SimulatedMotor {
    fn set(&mut self, value: f32) {
        self.value = value;
        self.writes += 1;
    }

    fn get(&self) -> f32 {
        self.value
    }

    fn inverted(&self) -> bool {
        self.inverted
    }
}

pub struct SimulatedMotorBus {
    frame: MotorFrame,
}

impl SimulatedMotorBus {
    pub fn new(frame: MotorFrame) -> Self {
        Self { frame }
    }
}

#[async_trait]
impl MotorBus for SimulatedMotorBus {
    async fn flush(&mut self) -> Result<()> {
        let [channel_0, channel_1] = self.frame.load();
        trace!(channel_0, channel_1, "Simulated motor frame");
        Ok(())
    }
}
