//! Backing store for the persisted service list
//!
//! CRUD over configured services plus ordering and cache bookkeeping. The
//! bundled implementation is the SQLite [`Database`].
//!
//! [`Database`]: crate::database::Database

use crate::service::{Service, ServiceData};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

#[async_trait]
pub trait ServiceApi: Send + Sync {
    /// All services, in any order; callers sort by `order`.
    async fn all(&self) -> Result<Vec<Service>>;

    async fn create(&self, recipe_id: &str, data: &ServiceData) -> Result<Service>;

    async fn update(&self, service_id: &str, data: &ServiceData) -> Result<Service>;

    async fn delete(&self, service_id: &str) -> Result<()>;

    /// Persist a full `id -> order` assignment.
    async fn reorder(&self, orders: &HashMap<String, usize>) -> Result<()>;

    async fn clear_cache(&self, service_id: &str) -> Result<()>;
}
