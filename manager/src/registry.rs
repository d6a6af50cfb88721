//! Ordered in-memory collection of services
//!
//! The position of a service in the registry is its `order`; every mutation
//! that moves services around reindexes the whole list so the orders stay a
//! dense permutation of `0..len`.

use crate::errors::ServiceError;
use crate::service::Service;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Default)]
pub struct ServiceRegistry {
    services: Vec<Service>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self {
            services: Vec::with_capacity(16),
        }
    }

    /// Replace the whole list, sorted by the incoming `order` values.
    pub fn replace_all(&mut self, mut services: Vec<Service>) {
        services.sort_by_key(|s| s.order);
        self.services = services;
        self.reindex();
    }

    /// Append a service at the end of the list.
    pub fn insert(&mut self, mut service: Service) {
        service.order = self.services.len();
        self.services.push(service);
    }

    pub fn remove(&mut self, service_id: &str) -> Option<Service> {
        let index = self.position(service_id)?;
        let removed = self.services.remove(index);
        self.reindex();
        Some(removed)
    }

    #[inline]
    pub fn get(&self, service_id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == service_id)
    }

    #[inline]
    pub fn get_mut(&mut self, service_id: &str) -> Option<&mut Service> {
        self.services.iter_mut().find(|s| s.id == service_id)
    }

    pub fn all(&self) -> &[Service] {
        &self.services
    }

    pub fn all_mut(&mut self) -> impl Iterator<Item = &mut Service> {
        self.services.iter_mut()
    }

    pub fn enabled(&self) -> Vec<&Service> {
        self.services.iter().filter(|s| s.is_enabled).collect()
    }

    pub fn active(&self) -> Option<&Service> {
        self.services.iter().find(|s| s.is_active)
    }

    pub fn position(&self, service_id: &str) -> Option<usize> {
        self.services.iter().position(|s| s.id == service_id)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Move the service at `old_index` to `new_index` (remove, then insert)
    /// and return the resulting `id -> order` map.
    pub fn reorder(
        &mut self,
        old_index: usize,
        new_index: usize,
    ) -> Result<HashMap<String, usize>, ServiceError> {
        let len = self.services.len();
        for index in [old_index, new_index] {
            if index >= len {
                return Err(ServiceError::InvalidIndex { index, len });
            }
        }

        let moved = self.services.remove(old_index);
        debug!("Moving service {} from {} to {}", moved.id, old_index, new_index);
        self.services.insert(new_index, moved);
        self.reindex();

        Ok(self.order_map())
    }

    pub fn order_map(&self) -> HashMap<String, usize> {
        self.services
            .iter()
            .map(|s| (s.id.clone(), s.order))
            .collect()
    }

    /// Make `service_id` the only active service.
    pub fn set_active(&mut self, service_id: &str) -> Result<(), ServiceError> {
        if self.get(service_id).is_none() {
            return Err(ServiceError::NotFound {
                service_id: service_id.to_string(),
            });
        }

        for service in &mut self.services {
            service.is_active = service.id == service_id;
        }
        Ok(())
    }

    /// Clear the active flag. Returns the id of the previously active service.
    pub fn blur_active(&mut self) -> Option<String> {
        let active = self.services.iter_mut().find(|s| s.is_active)?;
        active.is_active = false;
        Some(active.id.clone())
    }

    pub fn set_enabled(&mut self, service_id: &str, enabled: bool) -> Result<(), ServiceError> {
        let service = self.get_mut(service_id).ok_or_else(|| ServiceError::NotFound {
            service_id: service_id.to_string(),
        })?;
        service.is_enabled = enabled;
        Ok(())
    }

    /// Put a service into hibernation. The active service is never hibernated;
    /// returns whether the service is now hibernating because of this call.
    pub fn hibernate(&mut self, service_id: &str, now: DateTime<Utc>) -> Result<bool, ServiceError> {
        let service = self.get_mut(service_id).ok_or_else(|| ServiceError::NotFound {
            service_id: service_id.to_string(),
        })?;

        if service.is_active {
            debug!("Skipping service hibernation for {}", service.name);
            return Ok(false);
        }

        service.last_hibernated = Some(now);
        Ok(true)
    }

    pub fn wake(&mut self, service_id: &str, now: DateTime<Utc>) -> Result<(), ServiceError> {
        let service = self.get_mut(service_id).ok_or_else(|| ServiceError::NotFound {
            service_id: service_id.to_string(),
        })?;

        service.last_hibernated = None;
        service.last_used = now;
        Ok(())
    }

    fn reindex(&mut self) {
        for (index, service) in self.services.iter_mut().enumerate() {
            service.order = index;
        }
    }
}
