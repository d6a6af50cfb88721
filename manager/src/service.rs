//! Service records: one configured connection to a messaging integration
//!
//! Persisted attributes come from the service API; the heartbeat, hibernation
//! and attachment fields only exist for the lifetime of the process.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub recipe_id: String,
    pub name: String,
    pub icon_url: String,
    pub has_custom_uploaded_icon: bool,
    pub team: Option<String>,
    pub custom_url: Option<String>,
    pub order: usize,

    pub is_enabled: bool,
    pub is_notification_enabled: bool,
    pub is_badge_enabled: bool,
    pub is_indirect_message_badge_enabled: bool,
    pub is_muted: bool,
    pub is_dark_mode_enabled: bool,
    pub spellchecker_language: Option<String>,

    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_attached: bool,
    #[serde(default)]
    pub is_polling: bool,
    #[serde(default = "Utc::now")]
    pub last_used: DateTime<Utc>,
    #[serde(default)]
    pub last_poll: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_poll_answer: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_hibernated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub lost_recipe_connection: bool,
    #[serde(default)]
    pub lost_recipe_reload_attempt: u32,
    #[serde(default)]
    pub unread_direct_message_count: u32,
    #[serde(default)]
    pub unread_indirect_message_count: u32,
}

/// Partial update applied to a service, both locally and through the API.
///
/// `None` leaves a field untouched. An empty `spellchecker_language` clears
/// the per-service locale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceData {
    pub name: Option<String>,
    pub team: Option<String>,
    pub custom_url: Option<String>,
    pub custom_icon_url: Option<String>,
    pub delete_custom_icon: bool,
    pub is_enabled: Option<bool>,
    pub is_notification_enabled: Option<bool>,
    pub is_badge_enabled: Option<bool>,
    pub is_indirect_message_badge_enabled: Option<bool>,
    pub is_muted: Option<bool>,
    pub is_dark_mode_enabled: Option<bool>,
    pub spellchecker_language: Option<String>,
}

impl Service {
    pub fn new(id: &str, recipe_id: &str, name: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: id.to_string(),
            recipe_id: recipe_id.to_string(),
            name: name.to_string(),
            icon_url: String::new(),
            has_custom_uploaded_icon: false,
            team: None,
            custom_url: None,
            order: 0,
            is_enabled: true,
            is_notification_enabled: true,
            is_badge_enabled: true,
            is_indirect_message_badge_enabled: true,
            is_muted: false,
            is_dark_mode_enabled: false,
            spellchecker_language: None,
            is_active: false,
            is_attached: false,
            is_polling: false,
            last_used: now,
            last_poll: None,
            last_poll_answer: None,
            last_hibernated: None,
            lost_recipe_connection: false,
            lost_recipe_reload_attempt: 0,
            unread_direct_message_count: 0,
            unread_indirect_message_count: 0,
        }
    }

    #[inline]
    pub fn is_hibernating(&self) -> bool {
        self.last_hibernated.is_some()
    }

    pub fn reset_message_count(&mut self) {
        self.unread_direct_message_count = 0;
        self.unread_indirect_message_count = 0;
    }

    /// Apply the persisted part of an update to this record.
    pub fn apply(&mut self, data: &ServiceData) {
        if let Some(name) = &data.name {
            self.name = name.clone();
        }
        if let Some(team) = &data.team {
            self.team = Some(team.clone());
        }
        if let Some(custom_url) = &data.custom_url {
            self.custom_url = Some(custom_url.clone());
        }
        if data.delete_custom_icon {
            self.icon_url.clear();
            self.has_custom_uploaded_icon = false;
        }
        if let Some(url) = &data.custom_icon_url {
            self.icon_url = url.clone();
        }
        if let Some(enabled) = data.is_enabled {
            self.is_enabled = enabled;
        }
        if let Some(enabled) = data.is_notification_enabled {
            self.is_notification_enabled = enabled;
        }
        if let Some(enabled) = data.is_badge_enabled {
            self.is_badge_enabled = enabled;
        }
        if let Some(enabled) = data.is_indirect_message_badge_enabled {
            self.is_indirect_message_badge_enabled = enabled;
        }
        if let Some(muted) = data.is_muted {
            self.is_muted = muted;
        }
        if let Some(enabled) = data.is_dark_mode_enabled {
            self.is_dark_mode_enabled = enabled;
        }
        if let Some(language) = &data.spellchecker_language {
            self.spellchecker_language = if language.is_empty() {
                None
            } else {
                Some(language.clone())
            };
        }
    }

    /// Settings handed to the recipe on `initialize-recipe`.
    pub fn share_with_webview(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "spellcheckerLanguage": self.spellchecker_language,
            "isDarkModeEnabled": self.is_dark_mode_enabled,
            "team": self.team,
            "customUrl": self.custom_url,
            "hasCustomIcon": self.has_custom_uploaded_icon,
        })
    }
}
