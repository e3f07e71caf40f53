use super::{MotorBus, MotorFrame};
use crate::error::MotorBusError;
use anyhow::Error;
use anyhow::Result;
use async_trait::async_trait;
use bytes::{BufMut, BytesMut};
use futures::SinkExt;
use tokio_serial::SerialPortBuilderExt;
use tokio_util::codec::{Decoder, Encoder};

/// Applied output of both channels, as sent to the DC motor controller.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct WireMoveCommand {
    pub wheel_a: f32,
    pub wheel_b: f32,
}

impl WireMoveCommand {
    pub fn new(wheel_a: f32, wheel_b: f32) -> Self {
        Self { wheel_a, wheel_b }
    }

    fn encode(&self) -> Vec<u8> {
        // direction byte followed by magnitude for each wheel
        let buffer = vec![
            (self.wheel_a > 0.0) as u8,
            to_magnitude(self.wheel_a),
            (self.wheel_b > 0.0) as u8,
            to_magnitude(self.wheel_b),
        ];

        let mut encoded = postcard_cobs::encode_vec(&buffer);
        encoded.push(0);
        encoded
    }
}

fn to_magnitude(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    (value.abs().min(1.0) * u8::MAX as f32).round() as u8
}

pub struct MotorControllerProtocol;

impl Decoder for MotorControllerProtocol {
    type Item = ();
    type Error = Error;

    fn decode(&mut self, _: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        Ok(None)
    }
}

impl Encoder<WireMoveCommand> for MotorControllerProtocol {
    type Error = Error;

    fn encode(&mut self, data: WireMoveCommand, buf: &mut BytesMut) -> Result<(), Error> {
        let encoded_data = data.encode();
        buf.reserve(encoded_data.len());
        buf.put_slice(&encoded_data);
        Ok(())
    }
}

pub struct SerialMotorBus {
    framed_port: tokio_util::codec::Framed<tokio_serial::SerialStream, MotorControllerProtocol>,
    frame: MotorFrame,
}

const BAUD_RATE: u32 = 115200;

impl SerialMotorBus {
    pub fn new(port: &str, frame: MotorFrame) -> Result<Self> {
        let serial_port = tokio_serial::new(port, BAUD_RATE)
            .open_native_async()
            .map_err(|_| MotorBusError::FailedOpeningSerialPort)?;
        Ok(Self {
            framed_port: MotorControllerProtocol.framed(serial_port),
            frame,
        })
    }
}

#[async_trait]
impl MotorBus for SerialMotorBus {
    async fn flush(&mut self) -> Result<()> {
        self.framed_port
            .send(self.frame.wire_command())
            .await
            .map_err(|_| MotorBusError::CommError)?;
        Ok(())
    }
}
