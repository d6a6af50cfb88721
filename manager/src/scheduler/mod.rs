//! Periodic service maintenance
//!
//! This module decides, on a fixed interval, which services should be put to
//! sleep, woken up again or reloaded because their recipe stopped answering:
//!
//! - **Hibernation**: an inactive service idle for longer than the
//!   hibernation strategy is hibernated
//! - **Wake-up**: a hibernated service sleeping longer than the wake-up
//!   strategy is woken
//! - **Heartbeat**: a poll unanswered for more than a minute triggers up to
//!   three reloads of an inactive service, or flags the active one
//!
//! # Configuration
//!
//! ```toml
//! maintenance_interval_seconds = 10
//! recipe_poll_interval_seconds = 2
//!
//! [app]
//! hibernationStrategy = 300  # 0 disables
//! wakeUpStrategy = 3600      # <= 0 disables
//! ```

pub mod maintenance;
pub mod runner;

pub use maintenance::MaintenanceScheduler;
pub use runner::MaintenanceLoop;

use serde::Serialize;

/// What a single maintenance tick changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MaintenanceReport {
    pub hibernated: Vec<String>,
    pub woken: Vec<String>,
    pub reloaded: Vec<String>,
    pub lost_connection: Vec<String>,
}

impl MaintenanceReport {
    pub fn is_empty(&self) -> bool {
        self.hibernated.is_empty()
            && self.woken.is_empty()
            && self.reloaded.is_empty()
            && self.lost_connection.is_empty()
    }
}
