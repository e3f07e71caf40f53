#![doc = include_str!("../README.md")]
pub mod commands;
pub mod configuration;
pub mod differential_drive;
pub mod drive_style;
pub mod drive_train;
pub mod driver;
pub mod error;
pub mod gamepad;
pub mod governor;
pub mod logging;
pub mod telemetry;
pub mod teleop;
