//! Partition store that only counts removals

use anyhow::Result;
use async_trait::async_trait;
use service_manager::PartitionStore;
use std::sync::Mutex;

#[derive(Default)]
pub struct MockPartitionStore {
    removed: Mutex<Vec<(String, bool)>>,
    cleared: Mutex<Vec<String>>,
}

impl MockPartitionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(service_id, add_service_prefix)` for every removal, in call order.
    pub fn removed(&self) -> Vec<(String, bool)> {
        self.removed.lock().unwrap().clone()
    }

    pub fn cleared(&self) -> Vec<String> {
        self.cleared.lock().unwrap().clone()
    }
}

#[async_trait]
impl PartitionStore for MockPartitionStore {
    async fn remove_partition(&self, service_id: &str, add_service_prefix: bool) -> Result<()> {
        self.removed
            .lock()
            .unwrap()
            .push((service_id.to_string(), add_service_prefix));
        Ok(())
    }

    async fn clear_cache(&self, service_id: &str) -> Result<()> {
        self.cleared.lock().unwrap().push(service_id.to_string());
        Ok(())
    }

    async fn service_ids(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}
