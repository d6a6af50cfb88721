//! Unit tests for configuration parsing and validation
//!
//! These tests verify that configuration files are parsed correctly
//! and validation rules are enforced.

mod common;

use service_manager::config::ConfigManager;
use service_manager::errors::ConfigError;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[tokio::test]
async fn test_load_main_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_dir = temp_dir.path().join("config");
    fs::create_dir(&config_dir).unwrap();

    let main_toml = r#"
data_dir = "/var/lib/services"
recipes_source_dir = "/usr/share/recipes"
maintenance_interval_seconds = 15
recipe_poll_interval_seconds = 3

[app]
hibernationStrategy = 600
wakeUpStrategy = 3600
showDisabledServices = false
spellcheckerLanguage = "de"
scheduledDndEnabled = false
isOnline = true
    "#;
    fs::write(config_dir.join("main.toml"), main_toml).unwrap();

    let manager = ConfigManager::new(config_dir.to_string_lossy().into_owned())
        .await
        .unwrap();
    let config = manager.get_current_config();

    assert_eq!(config.data_dir, "/var/lib/services");
    assert_eq!(config.recipes_source_dir, "/usr/share/recipes");
    assert_eq!(config.maintenance_interval_seconds, 15);
    assert_eq!(config.recipe_poll_interval_seconds, 3);
    assert_eq!(config.app.hibernation_strategy, 600);
    assert_eq!(config.app.wake_up_strategy, 3600);
    assert!(!config.app.show_disabled_services);
    assert_eq!(config.app.spellchecker_language.as_deref(), Some("de"));
}

#[tokio::test]
async fn test_missing_main_config_fails_to_load() {
    let temp_dir = TempDir::new().unwrap();

    let err = ConfigManager::new(temp_dir.path().to_string_lossy().into_owned())
        .await
        .err()
        .expect("loading must fail");

    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::LoadFailed { .. })
    ));
}

#[test]
fn test_derived_paths_live_under_data_dir() {
    let config = ConfigManager::parse(r#"data_dir = "/data""#).unwrap();

    assert_eq!(config.database_path(), PathBuf::from("/data/services.db"));
    assert_eq!(config.partitions_dir(), PathBuf::from("/data/Partitions"));
    assert_eq!(config.recipes_dir(), PathBuf::from("/data/recipes"));
}

#[test]
fn test_partial_app_settings_keep_defaults() {
    let config = ConfigManager::parse(
        r#"
[app]
isAppMuted = true
    "#,
    )
    .unwrap();

    assert!(config.app.is_app_muted);
    assert!(config.app.show_disabled_services);
    assert!(config.app.show_message_badge_when_muted);
    assert_eq!(config.app.hibernation_strategy, 300);
    assert_eq!(config.app.scheduled_dnd_start, "17:00");
    assert_eq!(config.app.scheduled_dnd_end, "09:00");
}

#[test]
fn test_invalid_values_are_rejected() {
    for (content, field) in [
        ("recipe_poll_interval_seconds = 0", "recipe_poll_interval_seconds"),
        ("data_dir = \"  \"", "data_dir"),
    ] {
        let err = ConfigManager::parse(content).unwrap_err();
        assert!(
            matches!(
                err.downcast_ref::<ConfigError>(),
                Some(ConfigError::InvalidValue { field: f, .. }) if f == field
            ),
            "{} should be rejected",
            field
        );
    }
}

#[test]
fn test_malformed_toml_is_parse_error() {
    let err = ConfigManager::parse("maintenance_interval_seconds = \"ten\"").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::ParseError { .. })
    ));
}
