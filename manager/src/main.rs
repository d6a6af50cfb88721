// File: manager/src/main.rs
use anyhow::Result;
use service_manager::errors::ManagerError;
use service_manager::{
    ConfigManager, Database, FilesystemPartitionStore, LoggingWebviewHost, MaintenanceLoop,
    RecipeDirectory, ServicesStore, StoreEvent,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::from_default_env()
        .add_directive("service_manager=info".parse()?)
        .add_directive("manager=info".parse()?)
        .add_directive("sqlx=warn".parse()?);

    fmt().with_env_filter(env_filter).init();

    info!("Starting service manager");

    if let Err(e) = run().await {
        let err = ManagerError::from(e);
        error!("Service manager stopped: {}", err);
        return Err(err.into());
    }

    Ok(())
}

async fn run() -> Result<()> {
    let config_dir = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());
    let config_manager = ConfigManager::new(config_dir).await?;
    let config = config_manager.get_current_config();

    let database = Arc::new(Database::new(&config.database_path()).await?);
    let partitions = Arc::new(FilesystemPartitionStore::new(config.partitions_dir()));
    let recipes = Arc::new(RecipeDirectory::new(
        config.recipes_source_dir.clone(),
        config.recipes_dir(),
    ));
    let webview = Arc::new(LoggingWebviewHost);

    let (mut store, mut events) =
        ServicesStore::new(config.app.clone(), database, webview, partitions, recipes);

    let loaded = store.load().await?;
    store.ensure_active_service()?;
    info!("Services store ready with {} services", loaded);

    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                StoreEvent::Notification(notification) => info!(
                    "Notification from {}: {}",
                    notification.service_id, notification.title
                ),
                other => info!("Store event: {:?}", other),
            }
        }
    });

    let store = Arc::new(Mutex::new(store));
    let mut maintenance = MaintenanceLoop::new(
        store.clone(),
        Duration::from_secs(config.maintenance_interval_seconds),
        Duration::from_secs(config.recipe_poll_interval_seconds),
    );
    maintenance.start();

    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }

    info!("Shutting down");
    maintenance.stop().await;

    Ok(())
}
