use thiserror::Error;

/// Wrapper for errors from crates that don't return `std::error::Error` types.
#[derive(Error, Debug)]
pub enum ErrorWrapper {
    #[error("zenoh error {0:?}")]
    ZenohError(zenoh::Error),
}

/// Configuration-time failures. Nothing on the per-tick path returns these.
#[derive(Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum DriveTrainError {
    #[error("motor channel {0} does not exist on the motor controller")]
    MotorChannelOutOfRange(usize),
    #[error("left and right motor both assigned to channel {0}")]
    SharedMotorChannel(usize),
    #[error("control loop rate must be positive")]
    InvalidLoopRate,
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MotorBusError {
    #[error("communication with motor driver failed")]
    CommError,
    #[error("failed opening serial port")]
    FailedOpeningSerialPort,
}
