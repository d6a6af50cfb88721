//! Database record types (entities).

use crate::service::Service;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: String,
    pub recipe_id: String,
    pub name: String,
    pub icon_url: String,
    pub has_custom_uploaded_icon: bool,
    pub team: Option<String>,
    pub custom_url: Option<String>,
    pub order_index: i64,
    pub is_enabled: bool,
    pub is_notification_enabled: bool,
    pub is_badge_enabled: bool,
    pub is_indirect_message_badge_enabled: bool,
    pub is_muted: bool,
    pub is_dark_mode_enabled: bool,
    pub spellchecker_language: Option<String>,
    pub cache_cleared_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ServiceRecord {
    pub(crate) fn from_row(row: &SqliteRow) -> Self {
        Self {
            id: row.get("id"),
            recipe_id: row.get("recipe_id"),
            name: row.get("name"),
            icon_url: row.get("icon_url"),
            has_custom_uploaded_icon: row.get("has_custom_uploaded_icon"),
            team: row.get("team"),
            custom_url: row.get("custom_url"),
            order_index: row.get("order_index"),
            is_enabled: row.get("is_enabled"),
            is_notification_enabled: row.get("is_notification_enabled"),
            is_badge_enabled: row.get("is_badge_enabled"),
            is_indirect_message_badge_enabled: row.get("is_indirect_message_badge_enabled"),
            is_muted: row.get("is_muted"),
            is_dark_mode_enabled: row.get("is_dark_mode_enabled"),
            spellchecker_language: row.get("spellchecker_language"),
            cache_cleared_at: row.get("cache_cleared_at"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    /// Runtime service with fresh heartbeat state; `last_used` starts at `now`.
    pub fn into_service(self, now: DateTime<Utc>) -> Service {
        let mut service = Service::new(&self.id, &self.recipe_id, &self.name, now);
        service.icon_url = self.icon_url;
        service.has_custom_uploaded_icon = self.has_custom_uploaded_icon;
        service.team = self.team;
        service.custom_url = self.custom_url;
        service.order = self.order_index.max(0) as usize;
        service.is_enabled = self.is_enabled;
        service.is_notification_enabled = self.is_notification_enabled;
        service.is_badge_enabled = self.is_badge_enabled;
        service.is_indirect_message_badge_enabled = self.is_indirect_message_badge_enabled;
        service.is_muted = self.is_muted;
        service.is_dark_mode_enabled = self.is_dark_mode_enabled;
        service.spellchecker_language = self.spellchecker_language;
        service
    }
}
