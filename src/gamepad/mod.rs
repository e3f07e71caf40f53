mod bindings;
mod input;
mod messages;
mod throttle;

pub use bindings::{ButtonBinding, ButtonBindings, OperatorAction};
pub use input::OperatorInput;
pub use messages::{Axis, Button, GamepadMessage, InputMessage};
pub use throttle::{AxisThrottle, ThrottleConfig};

use crate::error::ErrorWrapper;
use anyhow::Result;
use std::{sync::Arc, time::Duration};
use tokio::{sync::watch, time::timeout};
use tracing::*;
use zenoh::{prelude::r#async::*, subscriber::FlumeSubscriber, Session, SessionDeclarations};

pub const GAMEPAD_TOPIC: &str = "remote-control/gamepad";

/// Inputs go neutral when the bridge has been silent this long.
const INPUT_TIMEOUT: Duration = Duration::from_millis(500);

pub async fn start_gamepad_loop(
    zenoh_session: Arc<Session>,
    input_sender: watch::Sender<OperatorInput>,
) -> Result<()> {
    let mut gamepad_subscriber = zenoh_session
        .declare_subscriber(GAMEPAD_TOPIC)
        .res()
        .await
        .map_err(ErrorWrapper::ZenohError)?;

    tokio::spawn(async move {
        while let Err(err) = run_gamepad_listener(&mut gamepad_subscriber, &input_sender).await {
            error!("Gamepad listener failed with {:?}", err);
            input_sender.send_replace(OperatorInput::default());
        }
    });
    Ok(())
}

async fn run_gamepad_listener(
    subscriber: &mut FlumeSubscriber<'_>,
    input_sender: &watch::Sender<OperatorInput>,
) -> anyhow::Result<()> {
    let mut timed_out = false;
    loop {
        let sample = match timeout(INPUT_TIMEOUT, subscriber.recv_async()).await {
            Ok(sample) => sample?,
            Err(_) => {
                if !timed_out {
                    warn!("No gamepad input for {:?}, stopping drive", INPUT_TIMEOUT);
                    timed_out = true;
                }
                input_sender.send_replace(OperatorInput::default());
                continue;
            }
        };
        timed_out = false;
        let message: String = sample.value.try_into()?;
        let message: InputMessage = serde_json::from_str(&message)?;

        let input = match message.get_first() {
            Some(gamepad_message) => OperatorInput::from_gamepad(gamepad_message),
            None => OperatorInput::default(),
        };
        trace!(?input, "Received gamepad input");
        input_sender.send_replace(input);
    }
}
