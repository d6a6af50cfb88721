//! Central repository for intervals, thresholds and default settings
//!
//! Constants are grouped by the component that consumes them so the
//! scheduler, the store and the config loader share one source of truth.

use std::time::Duration;

/// Maintenance scheduler timing
pub mod maintenance {
    use super::Duration;

    /// Default interval between two maintenance ticks
    pub const TICK_INTERVAL: Duration = Duration::from_secs(10);

    /// Poll/answer gap after which a recipe is considered unresponsive
    pub const HEARTBEAT_GAP_SECONDS: i64 = 60;

    /// Reload attempts for an unresponsive, inactive service
    pub const MAX_RELOAD_ATTEMPTS: u32 = 3;
}

/// Recipe polling
pub mod polling {
    use super::Duration;

    /// Delay between two `poll` messages sent to a recipe
    pub const RECIPE_POLL_INTERVAL: Duration = Duration::from_secs(2);
}

/// IPC channel names exchanged with service webviews
pub mod channels {
    pub const HELLO: &str = "hello";
    pub const ALIVE: &str = "alive";
    pub const POLL: &str = "poll";
    pub const MESSAGE_COUNTS: &str = "message-counts";
    pub const NOTIFICATION: &str = "notification";
    pub const AVATAR: &str = "avatar";
    pub const NEW_WINDOW: &str = "new-window";
    pub const SET_SPELLCHECKER_LANGUAGE: &str = "set-service-spellchecker-language";
    pub const INITIALIZE_RECIPE: &str = "initialize-recipe";
    pub const SETTINGS_UPDATE: &str = "settings-update";
    pub const SERVICE_SETTINGS_UPDATE: &str = "service-settings-update";
}

/// Partition directory layout
pub mod partitions {
    /// Directory under the data dir holding one partition per service
    pub const DIRECTORY_NAME: &str = "Partitions";

    /// Prefix used by partitions created for persisted sessions
    pub const SERVICE_PREFIX: &str = "service-";

    /// Entry in the partitions directory that is not a service
    pub const CHROME_EXTENSION_ENTRY: &str = "__chrome_extension";

    /// Cache directory inside a service partition
    pub const CACHE_DIRECTORY_NAME: &str = "Cache";
}

/// Default configuration values
pub mod defaults {
    /// Idle seconds before an inactive service is hibernated (0 disables)
    pub const HIBERNATION_STRATEGY_SECONDS: u64 = 300;

    /// Seconds a hibernated service stays asleep before waking (<= 0 disables)
    pub const WAKE_UP_STRATEGY_SECONDS: i64 = 0;

    pub const DATA_DIR: &str = "data";
    pub const RECIPES_SOURCE_DIR: &str = "recipes";
    pub const DATABASE_FILE: &str = "services.db";

    /// Locale used when neither the service nor the system provides one
    pub const FALLBACK_LOCALE: &str = "en-US";

    /// Icon shown for notifications when private notifications are on
    pub const PRIVATE_NOTIFICATION_ICON: &str = "/assets/img/notification-badge.gif";
}
