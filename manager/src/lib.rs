pub mod api;
pub mod config;
pub mod constants;
pub mod database;
pub mod errors;
pub mod heartbeat;
pub mod partitions;
pub mod recipes;
pub mod registry;
pub mod schedule;
pub mod scheduler;
pub mod service;
pub mod spellchecker;
pub mod store;
pub mod webview;

// Re-export commonly used types
pub use api::ServiceApi;
pub use config::{AppSettings, Config, ConfigManager};
pub use database::Database;
pub use heartbeat::PollHeartbeat;
pub use partitions::{FilesystemPartitionStore, PartitionStore};
pub use recipes::{RecipeCapabilities, RecipeDirectory, RecipeInstaller};
pub use registry::ServiceRegistry;
pub use scheduler::{MaintenanceLoop, MaintenanceReport, MaintenanceScheduler};
pub use service::{Service, ServiceData};
pub use store::{Notification, ServicesStore, StoreEvent};
pub use webview::{LoggingWebviewHost, WebviewHost};
