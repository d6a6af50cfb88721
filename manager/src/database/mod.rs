//! Database layer for the service manager.
//!
//! This module provides SQLite persistence for the configured services and
//! backs the [`ServiceApi`](crate::api::ServiceApi) seam:
//! - `records` - row type and its conversion into a runtime `Service`
//! - `services` - CRUD, reorder and cache bookkeeping

mod records;
mod services;

pub use records::ServiceRecord;

use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite, SqlitePool};
use std::path::Path;
use tracing::{debug, error, info};

pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Expose pool for integration test queries
    #[allow(dead_code)]
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn new(database_path: &Path) -> Result<Self> {
        info!("Database path: {}", database_path.display());

        if let Some(parent) = database_path.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                error!("Failed to create parent directory {:?}: {}", parent, e);
                return Err(e.into());
            }
        }

        let database_url = format!("sqlite:{}?mode=rwc", database_path.display());
        let pool = match SqlitePool::connect(&database_url).await {
            Ok(pool) => pool,
            Err(e) => {
                error!("Failed to connect to database {}: {}", database_url, e);
                return Err(e.into());
            }
        };

        let database = Self { pool };
        database.initialize_tables().await?;

        info!("Database initialized at {}", database_path.display());
        Ok(database)
    }

    /// Single-connection in-memory database, used by tests.
    pub async fn in_memory() -> Result<Self> {
        // The database lives only as long as its single connection
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let database = Self { pool };
        database.initialize_tables().await?;
        Ok(database)
    }

    async fn initialize_tables(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS services (
                id TEXT PRIMARY KEY,
                recipe_id TEXT NOT NULL,
                name TEXT NOT NULL,
                icon_url TEXT NOT NULL DEFAULT '',
                has_custom_uploaded_icon BOOLEAN NOT NULL DEFAULT 0,
                team TEXT,
                custom_url TEXT,
                order_index INTEGER NOT NULL,
                is_enabled BOOLEAN NOT NULL DEFAULT 1,
                is_notification_enabled BOOLEAN NOT NULL DEFAULT 1,
                is_badge_enabled BOOLEAN NOT NULL DEFAULT 1,
                is_indirect_message_badge_enabled BOOLEAN NOT NULL DEFAULT 1,
                is_muted BOOLEAN NOT NULL DEFAULT 0,
                is_dark_mode_enabled BOOLEAN NOT NULL DEFAULT 0,
                spellchecker_language TEXT,
                cache_cleared_at DATETIME,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_services_order ON services(order_index)")
            .execute(&self.pool)
            .await?;

        debug!("Database tables initialized");
        Ok(())
    }
}
