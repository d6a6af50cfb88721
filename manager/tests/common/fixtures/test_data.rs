//! Common test data and constants

use chrono::{DateTime, Duration, TimeZone, Utc};
use service_manager::Service;

/// Fixed reference instant so timing assertions are exact
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub fn secs(n: i64) -> Duration {
    Duration::seconds(n)
}

/// Service last used at `last_used`, with no heartbeat yet
pub fn service(id: &str, last_used: DateTime<Utc>) -> Service {
    Service::new(id, recipes::SLACK, id, last_used)
}

/// Common recipe ids
pub mod recipes {
    pub const SLACK: &str = "slack";
    pub const WHATSAPP: &str = "whatsapp";
    pub const TELEGRAM: &str = "telegram";
    pub const MISSING: &str = "does-not-exist";
}
