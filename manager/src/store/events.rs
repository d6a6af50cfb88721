//! Notifications the store emits for the embedding application

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub service_id: String,
    pub notification_id: Option<String>,
    pub title: String,
    pub body: String,
    pub icon: Option<String>,
    pub silent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StoreEvent {
    ActiveServiceChanged { service_id: String },
    Notification(Notification),
    OpenExternalUrl { url: String },
    BadgeChanged { direct: u32, indirect: u32 },
}
