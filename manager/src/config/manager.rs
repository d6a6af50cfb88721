// File: manager/src/config/manager.rs
use super::Config;
use crate::errors::ConfigError;
use anyhow::Result;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

pub struct ConfigManager {
    current_config: Arc<Config>,
}

impl ConfigManager {
    pub async fn new(config_dir: String) -> Result<Self> {
        let config = Self::load_configuration(&config_dir).await?;
        Ok(Self {
            current_config: Arc::new(config),
        })
    }

    pub fn from_config(config: Config) -> Result<Self> {
        Self::validate(&config)?;
        Ok(Self {
            current_config: Arc::new(config),
        })
    }

    pub fn get_current_config(&self) -> Arc<Config> {
        self.current_config.clone()
    }

    async fn load_configuration(config_dir: &str) -> Result<Config> {
        let main_config_path = format!("{}/main.toml", config_dir);
        debug!("Loading main config: {}", main_config_path);

        let main_config_content = fs::read_to_string(&main_config_path)
            .await
            .map_err(|e| ConfigError::LoadFailed {
                path: main_config_path.clone(),
                reason: e.to_string(),
            })?;

        let config = Self::parse(&main_config_content)?;

        info!(
            "Loaded config: data_dir={}, maintenance every {}s, hibernation after {}s, wake-up after {}s",
            config.data_dir,
            config.maintenance_interval_seconds,
            config.app.hibernation_strategy,
            config.app.wake_up_strategy
        );

        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Config> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            reason: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    fn validate(config: &Config) -> Result<()> {
        if config.maintenance_interval_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "maintenance_interval_seconds".to_string(),
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }

        if config.recipe_poll_interval_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "recipe_poll_interval_seconds".to_string(),
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }

        if config.data_dir.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "data_dir".to_string(),
                reason: "must not be empty".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
