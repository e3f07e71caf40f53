use config::Config;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::*;

use crate::{
    drive_train::DriveConfig,
    driver::MotorBusConfig,
    gamepad::{ButtonBindings, ThrottleConfig},
};

#[derive(Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub drive: DriveConfig,
    pub bus: MotorBusConfig,
    #[serde(default)]
    pub throttle: Option<ThrottleConfig>,
    #[serde(default)]
    pub bindings: ButtonBindings,
    #[serde(default)]
    pub zenoh: TankbotZenohConfig,
}

impl AppConfig {
    pub fn load_config(config: &Option<PathBuf>) -> anyhow::Result<Self> {
        let settings = if let Some(config) = config {
            info!("Using configuration from {:?}", config);
            Config::builder()
                .add_source(config::Environment::with_prefix("APP"))
                .add_source(config::File::with_name(
                    config
                        .to_str()
                        .ok_or_else(|| anyhow::anyhow!("Failed to convert path"))?,
                ))
                .build()?
        } else {
            info!("Using dev configuration");
            Config::builder()
                .add_source(config::Environment::with_prefix("APP"))
                .add_source(config::File::with_name("config/settings"))
                .add_source(config::File::with_name("config/dev_settings").required(false))
                .build()?
        };

        let app_config: AppConfig = settings.try_deserialize()?;
        app_config.drive.validate()?;
        Ok(app_config)
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct TankbotZenohConfig {
    #[serde(default)]
    pub connect: Vec<zenoh_config::EndPoint>,
    #[serde(default)]
    pub listen: Vec<zenoh_config::EndPoint>,
}

impl TankbotZenohConfig {
    /// Peer config with the configured endpoints, zenoh defaults otherwise.
    pub fn get_zenoh_config(&self) -> zenoh::config::Config {
        let mut config = zenoh::config::Config::default();
        if !self.connect.is_empty() {
            config.connect.endpoints.clone_from(&self.connect);
        }
        if !self.listen.is_empty() {
            config.listen.endpoints.clone_from(&self.listen);
        }
        config
    }
}
