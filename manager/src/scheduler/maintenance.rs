// File: manager/src/scheduler/maintenance.rs
use super::MaintenanceReport;
use crate::config::AppSettings;
use crate::constants::maintenance::MAX_RELOAD_ATTEMPTS;
use crate::heartbeat::PollHeartbeat;
use crate::registry::ServiceRegistry;
use crate::service::Service;
use crate::webview::WebviewHost;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

fn strategy_threshold<T: TryInto<i64>>(seconds: T) -> Option<Duration> {
    seconds.try_into().ok().and_then(Duration::try_seconds)
}

pub struct MaintenanceScheduler {
    webview: Arc<dyn WebviewHost>,
}

impl MaintenanceScheduler {
    pub fn new(webview: Arc<dyn WebviewHost>) -> Self {
        Self { webview }
    }

    /// Run one maintenance pass over every registered service.
    pub fn tick(
        &self,
        registry: &mut ServiceRegistry,
        settings: &AppSettings,
        now: DateTime<Utc>,
    ) -> MaintenanceReport {
        let mut report = MaintenanceReport::default();

        for service in registry.all_mut() {
            if !service.is_active {
                Self::apply_hibernation_strategy(service, settings, now, &mut report);
            }
            self.check_heartbeat(service, settings, &mut report);
        }

        if report.is_empty() {
            debug!("Service maintenance tick: nothing to do");
        } else {
            debug!("Service maintenance tick: {:?}", report);
        }

        report
    }

    fn apply_hibernation_strategy(
        service: &mut Service,
        settings: &AppSettings,
        now: DateTime<Utc>,
        report: &mut MaintenanceReport,
    ) {
        match service.last_hibernated {
            None => {
                if settings.hibernation_strategy == 0 {
                    return;
                }
                // Out of chrono's range means the threshold is never reached
                let Some(threshold) = strategy_threshold(settings.hibernation_strategy) else {
                    return;
                };
                if now - service.last_used > threshold {
                    info!("Hibernating idle service {} ({})", service.name, service.id);
                    service.last_hibernated = Some(now);
                    report.hibernated.push(service.id.clone());
                }
            }
            Some(hibernated_at) => {
                if settings.wake_up_strategy <= 0 {
                    return;
                }
                let Some(threshold) = strategy_threshold(settings.wake_up_strategy) else {
                    return;
                };
                if now - hibernated_at > threshold {
                    info!("Waking service {} ({}) from hibernation", service.name, service.id);
                    service.last_hibernated = None;
                    service.last_used = now;
                    report.woken.push(service.id.clone());
                }
            }
        }
    }

    fn check_heartbeat(
        &self,
        service: &mut Service,
        settings: &AppSettings,
        report: &mut MaintenanceReport,
    ) {
        if !PollHeartbeat::is_gap_open(service) {
            service.lost_recipe_connection = false;
            service.lost_recipe_reload_attempt = 0;
            return;
        }

        if service.is_active {
            if !service.lost_recipe_connection {
                warn!("Service lost connection: {} ({})", service.name, service.id);
            }
            service.lost_recipe_connection = true;
            report.lost_connection.push(service.id.clone());
            return;
        }

        if settings.is_online && service.lost_recipe_reload_attempt < MAX_RELOAD_ATTEMPTS {
            info!(
                "Reloading service: {} ({}). Attempt: {}",
                service.name, service.id, service.lost_recipe_reload_attempt
            );
            self.webview.reload(&service.id);
            service.lost_recipe_reload_attempt += 1;
            service.lost_recipe_connection = false;
            report.reloaded.push(service.id.clone());
        }
    }
}
