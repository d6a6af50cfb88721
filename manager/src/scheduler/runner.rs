// File: manager/src/scheduler/runner.rs
use crate::store::ServicesStore;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Background task driving maintenance ticks and recipe polling.
///
/// Both timers run in one task and take the store lock for the duration of a
/// tick, so ticks never interleave with each other or with user actions.
pub struct MaintenanceLoop {
    store: Arc<Mutex<ServicesStore>>,
    tick_interval: Duration,
    poll_interval: Duration,
    handle: Option<JoinHandle<()>>,
    stop: Option<watch::Sender<bool>>,
}

impl MaintenanceLoop {
    pub fn new(
        store: Arc<Mutex<ServicesStore>>,
        tick_interval: Duration,
        poll_interval: Duration,
    ) -> Self {
        Self {
            store,
            tick_interval,
            poll_interval,
            handle: None,
            stop: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.stop.is_some()
    }

    pub fn start(&mut self) {
        if self.stop.is_some() {
            return;
        }
        let (tx, mut rx) = watch::channel(false);
        self.stop = Some(tx);

        let store = Arc::clone(&self.store);
        let tick_interval = self.tick_interval;
        let poll_interval = self.poll_interval;

        info!(
            "Starting service maintenance every {}s, recipe polling every {}s",
            tick_interval.as_secs(),
            poll_interval.as_secs()
        );

        self.handle = Some(tokio::spawn(async move {
            let mut maintenance = interval_at(Instant::now() + tick_interval, tick_interval);
            maintenance.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut polling = interval_at(Instant::now() + poll_interval, poll_interval);
            polling.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut tick_count = 0u64;

            loop {
                tokio::select! {
                    _ = maintenance.tick() => {
                        tick_count += 1;
                        let report = store.lock().await.run_maintenance(Utc::now());
                        if !report.is_empty() {
                            info!(
                                "Maintenance tick #{}: {} hibernated, {} woken, {} reloaded, {} lost connection",
                                tick_count,
                                report.hibernated.len(),
                                report.woken.len(),
                                report.reloaded.len(),
                                report.lost_connection.len()
                            );
                        }
                    }
                    _ = polling.tick() => {
                        store.lock().await.poll_recipes(Utc::now());
                    }
                    changed = rx.changed() => {
                        if changed.is_err() || *rx.borrow() {
                            break;
                        }
                    }
                }
            }

            debug!("Service maintenance loop exited after {} ticks", tick_count);
        }));
    }

    /// Stop future ticks and wait for the task to finish. Safe to call twice.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.stop.take() {
            let _ = tx.send(true);
            info!("Stopping service maintenance");
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}
