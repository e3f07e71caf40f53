use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tankbot::{
    configuration,
    drive_train::DriveTrain,
    driver::motor_bus_from_config,
    error::ErrorWrapper,
    gamepad::{start_gamepad_loop, AxisThrottle, OperatorInput},
    logging,
    telemetry::{TelemetryFrame, TracingTelemetry},
    teleop::Teleop,
};
use tokio::{
    sync::watch,
    time::{interval, MissedTickBehavior},
};
use tracing::*;
use zenoh::prelude::r#async::*;

const TELEMETRY_TOPIC: &str = "drive-train/telemetry";

#[derive(Parser, Debug)]
#[command(version, about = "Tank drive teleoperation")]
struct Args {
    /// path to config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sets the level of verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbosity: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::setup_tracing(args.verbosity);

    let app_config = configuration::AppConfig::load_config(&args.config)?;
    let tick_period = app_config.drive.tick_period()?;

    let (mut motor_bus, left_motor, right_motor) = motor_bus_from_config(
        &app_config.bus,
        app_config.drive.left_motor,
        app_config.drive.right_motor,
    )
    .await?;

    let (input_sender, input_receiver) = watch::channel(OperatorInput::default());

    let mut drive_train = DriveTrain::from_config(&app_config.drive, left_motor, right_motor)?;
    if let Some(throttle_config) = app_config.throttle.clone() {
        info!("Using throttle on {:?}", throttle_config.axis);
        drive_train = drive_train.with_throttle(Box::new(AxisThrottle::new(
            input_receiver.clone(),
            throttle_config,
        )));
    }
    let mut teleop = Teleop::new(drive_train, app_config.bindings.clone());

    // zenoh
    let zenoh_config = app_config.zenoh.get_zenoh_config();
    let zenoh_session = zenoh::open(zenoh_config)
        .res()
        .await
        .map_err(ErrorWrapper::ZenohError)?
        .into_arc();

    start_gamepad_loop(zenoh_session.clone(), input_sender).await?;

    info!("Drive train running every {:?}", tick_period);
    let mut ticker = interval(tick_period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut tracing_telemetry = TracingTelemetry;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping drive train");
                break;
            }
        }

        let input = input_receiver.borrow().clone();
        teleop.tick(&input);

        if let Err(err) = motor_bus.flush().await {
            error!("Failed to send motor frame {:?}", err);
        }

        let mut frame = TelemetryFrame::default();
        teleop.drive_train().publish_telemetry(&mut frame);
        teleop.drive_train().publish_telemetry(&mut tracing_telemetry);
        if let Err(err) = zenoh_session
            .put(TELEMETRY_TOPIC, frame.to_json()?)
            .res_async()
            .await
        {
            warn!("Failed to publish telemetry {:?}", err);
        }
    }

    teleop.stop();
    motor_bus.flush().await?;

    Ok(())
}
