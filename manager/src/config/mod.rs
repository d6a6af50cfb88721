// File: manager/src/config/mod.rs
pub mod manager;
use crate::constants::{defaults, maintenance, partitions, polling};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
pub use manager::ConfigManager;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_recipes_source_dir")]
    pub recipes_source_dir: String,
    #[serde(default = "default_maintenance_interval")]
    pub maintenance_interval_seconds: u64,
    #[serde(default = "default_recipe_poll_interval")]
    pub recipe_poll_interval_seconds: u64,
    #[serde(default)]
    pub app: AppSettings,
}

/// User-facing application settings consumed by the store and the scheduler.
///
/// The whole struct is also shared with every service webview on the
/// `settings-update` channel, hence the camelCase wire names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// Idle seconds before an inactive service hibernates, 0 disables
    pub hibernation_strategy: u64,
    /// Seconds before a hibernated service wakes up, <= 0 disables
    pub wake_up_strategy: i64,
    pub show_disabled_services: bool,
    pub is_app_muted: bool,
    pub show_message_badge_when_muted: bool,
    pub enable_spellchecking: bool,
    pub spellchecker_language: Option<String>,
    pub dark_mode: bool,
    pub private_notifications: bool,
    pub scheduled_dnd_enabled: bool,
    pub scheduled_dnd_start: String,
    pub scheduled_dnd_end: String,
    pub is_online: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            hibernation_strategy: defaults::HIBERNATION_STRATEGY_SECONDS,
            wake_up_strategy: defaults::WAKE_UP_STRATEGY_SECONDS,
            show_disabled_services: true,
            is_app_muted: false,
            show_message_badge_when_muted: true,
            enable_spellchecking: true,
            spellchecker_language: None,
            dark_mode: false,
            private_notifications: false,
            scheduled_dnd_enabled: false,
            scheduled_dnd_start: "17:00".to_string(),
            scheduled_dnd_end: "09:00".to_string(),
            is_online: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            recipes_source_dir: default_recipes_source_dir(),
            maintenance_interval_seconds: default_maintenance_interval(),
            recipe_poll_interval_seconds: default_recipe_poll_interval(),
            app: AppSettings::default(),
        }
    }
}

impl Config {
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(defaults::DATABASE_FILE)
    }

    pub fn partitions_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(partitions::DIRECTORY_NAME)
    }

    pub fn recipes_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("recipes")
    }
}

fn default_data_dir() -> String {
    defaults::DATA_DIR.to_string()
}

fn default_recipes_source_dir() -> String {
    defaults::RECIPES_SOURCE_DIR.to_string()
}

fn default_maintenance_interval() -> u64 {
    maintenance::TICK_INTERVAL.as_secs()
}

fn default_recipe_poll_interval() -> u64 {
    polling::RECIPE_POLL_INTERVAL.as_secs()
}
