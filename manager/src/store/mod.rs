//! Service store: owner of the registry and coordinator of every action
//!
//! The store holds the ordered service list, the user's app settings and the
//! collaborators (service API, webview host, partitions, recipes). User
//! actions, IPC messages from recipes and the periodic maintenance all go
//! through it, so state changes happen in one place.
//!
//! # Usage
//!
//! ```ignore
//! let (mut store, events) = ServicesStore::new(settings, api, webview, partitions, recipes);
//! store.load().await?;
//! store.ensure_active_service()?;
//! let service = store.create_service("slack", ServiceData::default()).await?;
//! store.set_active(&service.id)?;
//! ```

mod events;
mod ipc;

pub use events::{Notification, StoreEvent};

use crate::api::ServiceApi;
use crate::config::AppSettings;
use crate::errors::ServiceError;
use crate::heartbeat::PollHeartbeat;
use crate::partitions::PartitionStore;
use crate::recipes::RecipeInstaller;
use crate::registry::ServiceRegistry;
use crate::scheduler::{MaintenanceReport, MaintenanceScheduler};
use crate::service::{Service, ServiceData};
use crate::spellchecker::locale_by_fuzzy_identifier;
use crate::webview::WebviewHost;
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

pub struct ServicesStore {
    registry: ServiceRegistry,
    settings: AppSettings,
    api: Arc<dyn ServiceApi>,
    webview: Arc<dyn WebviewHost>,
    partitions: Arc<dyn PartitionStore>,
    recipes: Arc<dyn RecipeInstaller>,
    scheduler: MaintenanceScheduler,
    events: mpsc::UnboundedSender<StoreEvent>,
    filter_needle: Option<String>,
    // Most recent first, no duplicates
    last_used_services: Vec<String>,
}

impl ServicesStore {
    pub fn new(
        settings: AppSettings,
        api: Arc<dyn ServiceApi>,
        webview: Arc<dyn WebviewHost>,
        partitions: Arc<dyn PartitionStore>,
        recipes: Arc<dyn RecipeInstaller>,
    ) -> (Self, mpsc::UnboundedReceiver<StoreEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let store = Self {
            registry: ServiceRegistry::new(),
            settings,
            api,
            scheduler: MaintenanceScheduler::new(webview.clone()),
            webview,
            partitions,
            recipes,
            events,
            filter_needle: None,
            last_used_services: Vec::new(),
        };
        (store, receiver)
    }

    // Queries

    pub fn all(&self) -> &[Service] {
        self.registry.all()
    }

    pub fn enabled(&self) -> Vec<&Service> {
        self.registry.enabled()
    }

    /// Services shown in the sidebar: all of them, or only the enabled ones.
    pub fn all_displayed(&self) -> Vec<&Service> {
        if self.settings.show_disabled_services {
            self.registry.all().iter().collect()
        } else {
            self.registry.enabled()
        }
    }

    pub fn filtered(&self) -> Vec<&Service> {
        match &self.filter_needle {
            Some(needle) => {
                let needle = needle.to_lowercase();
                self.registry
                    .all()
                    .iter()
                    .filter(|s| s.name.to_lowercase().contains(&needle))
                    .collect()
            }
            None => self.registry.all().iter().collect(),
        }
    }

    pub fn active(&self) -> Option<&Service> {
        self.registry.active()
    }

    pub fn one(&self, service_id: &str) -> Option<&Service> {
        self.registry.get(service_id)
    }

    pub fn last_used_services(&self) -> &[String] {
        &self.last_used_services
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn filter(&mut self, needle: &str) {
        self.filter_needle = Some(needle.to_string());
    }

    pub fn reset_filter(&mut self) {
        self.filter_needle = None;
    }

    fn require(&self, service_id: &str) -> Result<&Service, ServiceError> {
        self.registry.get(service_id).ok_or_else(|| ServiceError::NotFound {
            service_id: service_id.to_string(),
        })
    }

    fn require_mut(&mut self, service_id: &str) -> Result<&mut Service, ServiceError> {
        self.registry
            .get_mut(service_id)
            .ok_or_else(|| ServiceError::NotFound {
                service_id: service_id.to_string(),
            })
    }

    fn emit(&self, event: StoreEvent) {
        if self.events.send(event).is_err() {
            debug!("No listener for store events");
        }
    }

    // Lifecycle

    /// Replace the registry with the services known to the API.
    pub async fn load(&mut self) -> Result<usize> {
        let services = self.api.all().await?;
        let count = services.len();
        self.registry.replace_all(services);
        info!("Loaded {} services", count);
        Ok(count)
    }

    #[instrument(skip(self, data))]
    pub async fn create_service(&mut self, recipe_id: &str, mut data: ServiceData) -> Result<Service> {
        if !self.recipes.is_installed(recipe_id).await {
            info!("Recipe \"{}\" is not installed, installing recipe", recipe_id);
            self.recipes
                .install(recipe_id)
                .await
                .map_err(|e| ServiceError::RecipeInstallFailed {
                    recipe_id: recipe_id.to_string(),
                    reason: e.to_string(),
                })?;
        }

        data.is_enabled.get_or_insert(true);
        data.is_notification_enabled.get_or_insert(true);
        data.is_badge_enabled.get_or_insert(true);
        data.is_muted.get_or_insert(false);
        data.is_dark_mode_enabled.get_or_insert(false);
        if data.spellchecker_language.is_none() {
            data.spellchecker_language = self
                .settings
                .spellchecker_language
                .as_deref()
                .and_then(locale_by_fuzzy_identifier)
                .map(str::to_string);
        }
        let data = self.clean_up_team_and_custom_url(recipe_id, data).await;

        let service = self.api.create(recipe_id, &data).await?;
        self.registry.insert(service.clone());

        info!("Service {} ({}) created", service.name, service.id);
        Ok(service)
    }

    #[instrument(skip(self, data))]
    pub async fn update_service(&mut self, service_id: &str, data: ServiceData) -> Result<()> {
        let recipe_id = self.require(service_id)?.recipe_id.clone();
        let data = self.clean_up_team_and_custom_url(&recipe_id, data).await;

        let updated = self.api.update(service_id, &data).await?;

        let service = self.require_mut(service_id)?;
        service.apply(&data);
        if updated.has_custom_uploaded_icon && !data.delete_custom_icon {
            service.has_custom_uploaded_icon = true;
        }
        let is_enabled = service.is_enabled;

        if is_enabled {
            self.send_ipc_message(
                service_id,
                crate::constants::channels::SERVICE_SETTINGS_UPDATE,
                serde_json::to_value(&data)?,
            );
        }

        debug!("Service {} updated", service_id);
        if data.is_enabled.is_some() {
            self.ensure_active_service()?;
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_service(&mut self, service_id: &str) -> Result<()> {
        self.require(service_id)?;
        self.api.delete(service_id).await?;

        self.registry.remove(service_id);
        self.last_used_services.retain(|id| id != service_id);
        self.api.reorder(&self.registry.order_map()).await?;
        self.partitions.remove_partition(service_id, true).await?;

        info!("Service {} deleted", service_id);
        self.ensure_active_service()
    }

    pub async fn clear_cache(&mut self, service_id: &str) -> Result<()> {
        self.require(service_id)?;
        self.api.clear_cache(service_id).await?;
        self.partitions.clear_cache(service_id).await?;
        Ok(())
    }

    /// For recipes accepting both a team id and a custom url, the two are
    /// exclusive and the custom url wins.
    async fn clean_up_team_and_custom_url(&self, recipe_id: &str, mut data: ServiceData) -> ServiceData {
        if data.team.is_none() || data.custom_url.is_none() {
            return data;
        }

        let capabilities = self.recipes.capabilities(recipe_id).await;
        if capabilities.has_team_id && capabilities.has_custom_url {
            debug!("Dropping team of {} in favour of its custom url", recipe_id);
            data.team = None;
        }
        data
    }

    // Activation

    pub fn set_active(&mut self, service_id: &str) -> Result<()> {
        self.registry.set_active(service_id)?;
        self.awake(service_id)?;

        self.last_used_services.retain(|id| id != service_id);
        self.last_used_services.insert(0, service_id.to_string());

        self.webview.focus(service_id);
        self.emit(StoreEvent::ActiveServiceChanged {
            service_id: service_id.to_string(),
        });
        Ok(())
    }

    pub fn blur_active(&mut self) {
        if let Some(id) = self.registry.blur_active() {
            debug!("Blurred active service {}", id);
        }
    }

    pub fn set_active_next(&mut self) -> Result<()> {
        self.step_active(1)
    }

    pub fn set_active_prev(&mut self) -> Result<()> {
        self.step_active(-1)
    }

    fn step_active(&mut self, delta: isize) -> Result<()> {
        let displayed: Vec<String> = self.all_displayed().iter().map(|s| s.id.clone()).collect();
        if displayed.is_empty() {
            return Ok(());
        }

        let current = displayed
            .iter()
            .position(|id| self.registry.get(id).map(|s| s.is_active).unwrap_or(false))
            .map(|i| i as isize)
            .unwrap_or(-1);
        let next = wrap_index(current, delta, displayed.len());
        self.set_active(&displayed[next])
    }

    /// Activate the first displayed service when none of them is active.
    pub fn ensure_active_service(&mut self) -> Result<()> {
        let displayed = self.all_displayed();
        if displayed.is_empty() || displayed.iter().any(|s| s.is_active) {
            return Ok(());
        }

        let first = displayed[0].id.clone();
        debug!("No active service found, setting active service to {}", first);
        self.set_active(&first)
    }

    // Toggles

    pub async fn toggle_service(&mut self, service_id: &str) -> Result<()> {
        let enabled = self.require(service_id)?.is_enabled;
        self.update_service(
            service_id,
            ServiceData {
                is_enabled: Some(!enabled),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn toggle_notifications(&mut self, service_id: &str) -> Result<()> {
        let enabled = self.require(service_id)?.is_notification_enabled;
        self.update_service(
            service_id,
            ServiceData {
                is_notification_enabled: Some(!enabled),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn toggle_audio(&mut self, service_id: &str) -> Result<()> {
        let muted = self.require(service_id)?.is_muted;
        self.update_service(
            service_id,
            ServiceData {
                is_muted: Some(!muted),
                ..Default::default()
            },
        )
        .await?;
        self.apply_mute_settings();
        Ok(())
    }

    pub async fn toggle_dark_mode(&mut self, service_id: &str) -> Result<()> {
        let enabled = self.require(service_id)?.is_dark_mode_enabled;
        self.update_service(
            service_id,
            ServiceData {
                is_dark_mode_enabled: Some(!enabled),
                ..Default::default()
            },
        )
        .await
    }

    // Hibernation

    pub fn hibernate(&mut self, service_id: &str) -> Result<()> {
        if self.registry.hibernate(service_id, Utc::now())? {
            info!("Hibernate {}", service_id);
        }
        Ok(())
    }

    pub fn awake(&mut self, service_id: &str) -> Result<()> {
        debug!("Waking up from service hibernation for {}", service_id);
        self.registry.wake(service_id, Utc::now())?;
        Ok(())
    }

    /// Reset poll timestamps of one service, or of every displayed service.
    pub fn reset_last_poll_timer(&mut self, service_id: Option<&str>) {
        let now = Utc::now();
        match service_id {
            Some(id) => {
                debug!("Reset last poll timer for service: \"{}\"", id);
                if let Some(service) = self.registry.get_mut(id) {
                    PollHeartbeat::reset(service, now);
                }
            }
            None => {
                debug!("Reset last poll timer for all services");
                let show_disabled = self.settings.show_disabled_services;
                for service in self.registry.all_mut() {
                    if show_disabled || service.is_enabled {
                        PollHeartbeat::reset(service, now);
                    }
                }
            }
        }
    }

    /// Run one maintenance pass with the current settings.
    pub fn run_maintenance(&mut self, now: DateTime<Utc>) -> MaintenanceReport {
        self.scheduler.tick(&mut self.registry, &self.settings, now)
    }

    // Ordering

    /// Move a service in the sidebar. Indices refer to the displayed list,
    /// which skips disabled services unless they are shown.
    #[instrument(skip(self))]
    pub async fn reorder(&mut self, old_index: usize, new_index: usize) -> Result<()> {
        let (old_index, new_index) = if self.settings.show_disabled_services {
            (old_index, new_index)
        } else {
            let enabled: Vec<String> = self.registry.enabled().iter().map(|s| s.id.clone()).collect();
            let to_full_index = |index: usize| -> Result<usize, ServiceError> {
                enabled
                    .get(index)
                    .and_then(|id| self.registry.position(id))
                    .ok_or(ServiceError::InvalidIndex {
                        index,
                        len: enabled.len(),
                    })
            };
            (to_full_index(old_index)?, to_full_index(new_index)?)
        };

        let orders = self.registry.reorder(old_index, new_index)?;
        self.api.reorder(&orders).await?;
        Ok(())
    }

    // Reloading

    pub fn reload(&mut self, service_id: &str) -> Result<()> {
        let service = self.require_mut(service_id)?;
        if !service.is_enabled {
            return Ok(());
        }

        service.reset_message_count();
        service.lost_recipe_connection = false;
        self.webview.reload(service_id);
        Ok(())
    }

    pub fn reload_active(&mut self) -> Result<()> {
        match self.registry.active().map(|s| s.id.clone()) {
            Some(id) => self.reload(&id),
            None => Ok(()),
        }
    }

    pub fn reload_all(&mut self) -> Result<()> {
        let ids: Vec<String> = self.registry.enabled().iter().map(|s| s.id.clone()).collect();
        for id in ids {
            self.reload(&id)?;
        }
        Ok(())
    }

    // Webview attachment

    pub fn attach_webview(&mut self, service_id: &str) -> Result<()> {
        let service = self.require_mut(service_id)?;
        if !service.is_attached {
            debug!("Webview for {} attached", service_id);
        }
        service.is_attached = true;
        let service_muted = service.is_muted;

        let muted = self.settings.is_app_muted || service_muted;
        self.webview.set_audio_muted(service_id, muted);
        Ok(())
    }

    pub fn detach_webview(&mut self, service_id: &str) -> Result<()> {
        let service = self.require_mut(service_id)?;
        service.is_attached = false;
        service.is_polling = false;
        Ok(())
    }

    // Settings

    /// Replace the app settings and push them to every service.
    pub fn update_settings(&mut self, settings: AppSettings) {
        if settings == self.settings {
            return;
        }
        self.settings = settings;
        self.share_settings_with_services();
        self.apply_mute_settings();
        self.update_badge();
    }

    /// Mute the webview of every enabled, attached service that is muted
    /// itself or while the whole app is muted.
    pub fn apply_mute_settings(&self) {
        for service in self.registry.all() {
            if service.is_enabled && service.is_attached {
                let muted = self.settings.is_app_muted || service.is_muted;
                self.webview.set_audio_muted(&service.id, muted);
            }
        }
    }

    /// Unread direct and indirect message totals shown on the app badge.
    pub fn unread_counts(&self) -> (u32, u32) {
        let show_when_muted = self.settings.show_message_badge_when_muted;
        let displayed = self.all_displayed();

        let direct = displayed
            .iter()
            .filter(|s| s.is_badge_enabled && (show_when_muted || s.is_notification_enabled))
            .map(|s| s.unread_direct_message_count)
            .sum();
        let indirect = displayed
            .iter()
            .filter(|s| show_when_muted && s.is_badge_enabled && s.is_indirect_message_badge_enabled)
            .map(|s| s.unread_indirect_message_count)
            .sum();

        (direct, indirect)
    }

    fn update_badge(&self) {
        let (direct, indirect) = self.unread_counts();
        self.emit(StoreEvent::BadgeChanged { direct, indirect });
    }
}

/// Wrap `index + delta` into `0..size`; `size` must be non-zero.
fn wrap_index(index: isize, delta: isize, size: usize) -> usize {
    let size = size as isize;
    (((index + delta) % size + size) % size) as usize
}
