//! Per-service session partitions on disk
//!
//! Every service keeps its browser session (cookies, storage, cache) in its own
//! directory under `<data_dir>/Partitions`. Persisted sessions use a
//! `service-<id>` directory name.

use crate::constants::partitions::{CACHE_DIRECTORY_NAME, CHROME_EXTENSION_ENTRY, SERVICE_PREFIX};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

#[async_trait]
pub trait PartitionStore: Send + Sync {
    /// Remove the partition of a service. Missing directories are not an error.
    async fn remove_partition(&self, service_id: &str, add_service_prefix: bool) -> Result<()>;

    /// Remove the cache directory inside a service partition.
    async fn clear_cache(&self, service_id: &str) -> Result<()>;

    /// Ids of every partition currently on disk.
    async fn service_ids(&self) -> Result<Vec<String>>;
}

pub struct FilesystemPartitionStore {
    root: PathBuf,
}

impl FilesystemPartitionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn partition_path<I, S>(&self, segments: I) -> PathBuf
    where
        I: IntoIterator<Item = S>,
        S: AsRef<Path>,
    {
        let mut path = self.root.clone();
        for segment in segments {
            path.push(segment);
        }
        path
    }

    fn service_partition(&self, service_id: &str, add_service_prefix: bool) -> PathBuf {
        let name = if add_service_prefix {
            format!("{}{}", SERVICE_PREFIX, service_id)
        } else {
            service_id.to_string()
        };
        self.partition_path([name])
    }
}

async fn remove_dir_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
    }
}

#[async_trait]
impl PartitionStore for FilesystemPartitionStore {
    async fn remove_partition(&self, service_id: &str, add_service_prefix: bool) -> Result<()> {
        let path = self.service_partition(service_id, add_service_prefix);
        if remove_dir_if_exists(&path).await? {
            info!("Removed partition directory {}", path.display());
        } else {
            debug!("No partition directory at {}", path.display());
        }
        Ok(())
    }

    async fn clear_cache(&self, service_id: &str) -> Result<()> {
        for prefixed in [true, false] {
            let path = self
                .service_partition(service_id, prefixed)
                .join(CACHE_DIRECTORY_NAME);
            if remove_dir_if_exists(&path).await? {
                info!("Cleared cache {}", path.display());
            }
        }
        Ok(())
    }

    async fn service_ids(&self) -> Result<Vec<String>> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read {}", self.root.display()))
            }
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name != CHROME_EXTENSION_ENTRY {
                ids.push(name);
            }
        }
        ids.sort();
        Ok(ids)
    }
}
