use anyhow::Result;
use clap::Parser;
use std::{path::PathBuf, time::Duration};
use tankbot::{
    configuration, drive_train::DriveTrain, driver::motor_bus_from_config,
    driver::MotorBus, driver::MotorOutput, logging,
};
use tokio::time::sleep;
use tracing::*;

#[derive(Parser, Debug)]
#[command(version, about = "Spin each side of the drive train to check wiring")]
struct Args {
    /// path to config
    #[arg(long)]
    config: Option<PathBuf>,

    /// speed used for the test
    #[arg(long, default_value_t = 0.3)]
    speed: f32,

    /// Sets the level of verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbosity: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::setup_tracing(args.verbosity);

    let app_config = configuration::AppConfig::load_config(&args.config)?;
    let (mut motor_bus, left_motor, right_motor) = motor_bus_from_config(
        &app_config.bus,
        app_config.drive.left_motor,
        app_config.drive.right_motor,
    )
    .await?;
    let mut drive_train = DriveTrain::from_config(&app_config.drive, left_motor, right_motor)?;

    info!("Left forward");
    drive_train.drive_tank(args.speed, 0.0);
    hold(&drive_train, &mut *motor_bus, Duration::from_secs(2)).await?;
    info!("Right forward");
    drive_train.drive_tank(0.0, args.speed);
    hold(&drive_train, &mut *motor_bus, Duration::from_secs(2)).await?;
    info!("Both forward");
    drive_train.drive_straight(args.speed);
    hold(&drive_train, &mut *motor_bus, Duration::from_secs(2)).await?;
    info!("Spin in place");
    drive_train.drive_arcade(0.0, args.speed);
    hold(&drive_train, &mut *motor_bus, Duration::from_secs(2)).await?;
    info!("Stopping");
    drive_train.stop_all_motors();
    motor_bus.flush().await?;
    Ok(())
}

/// Resend the current frame for `duration`.
async fn hold<M: MotorOutput>(
    drive_train: &DriveTrain<M>,
    motor_bus: &mut dyn MotorBus,
    duration: Duration,
) -> Result<()> {
    const RESEND: Duration = Duration::from_millis(100);
    info!(
        left = drive_train.left_motor().applied(),
        right = drive_train.right_motor().applied(),
        "Applied motor output"
    );
    let mut elapsed = Duration::ZERO;
    while elapsed < duration {
        motor_bus.flush().await?;
        sleep(RESEND).await;
        elapsed += RESEND;
    }
    Ok(())
}
