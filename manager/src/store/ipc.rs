//! IPC between the store and the recipes running inside service webviews.

use super::{Notification, ServicesStore, StoreEvent};
use crate::constants::{channels, defaults};
use crate::errors::ServiceError;
use crate::heartbeat::PollHeartbeat;
use crate::schedule::is_in_timeframe;
use crate::service::ServiceData;
use crate::spellchecker::{dictionary_chain, locale_by_fuzzy_identifier};
use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

fn first_arg<'a>(channel: &str, args: &'a Value) -> Result<&'a Value, ServiceError> {
    args.get(0).ok_or_else(|| ServiceError::InvalidMessage {
        channel: channel.to_string(),
        reason: "missing argument".to_string(),
    })
}

fn string_arg<'a>(channel: &str, args: &'a Value) -> Result<&'a str, ServiceError> {
    first_arg(channel, args)?
        .as_str()
        .ok_or_else(|| ServiceError::InvalidMessage {
            channel: channel.to_string(),
            reason: "expected a string".to_string(),
        })
}

fn count_field(value: &Value, field: &str) -> u32 {
    value
        .get(field)
        .and_then(Value::as_u64)
        .map(|n| n.min(u32::MAX as u64) as u32)
        .unwrap_or(0)
}

impl ServicesStore {
    /// Dispatch a message a recipe sent to the host. `args` is the JSON array
    /// of arguments the recipe passed along with the channel name.
    #[instrument(skip(self, args))]
    pub async fn handle_ipc_message(
        &mut self,
        service_id: &str,
        channel: &str,
        args: Value,
    ) -> Result<()> {
        self.require(service_id)?;

        match channel {
            channels::HELLO => {
                debug!("Received hello event from {}", service_id);
                self.start_recipe_polling(service_id, Utc::now())?;
                self.initialize_recipe(service_id)?;
                self.share_settings_with_services();
            }
            channels::ALIVE => {
                let service = self.require_mut(service_id)?;
                PollHeartbeat::record_poll_answered(service, Utc::now());
            }
            channels::MESSAGE_COUNTS => {
                let counts = first_arg(channel, &args)?;
                debug!("Received unread message info from '{}': {}", service_id, counts);
                let direct = count_field(counts, "direct");
                let indirect = count_field(counts, "indirect");

                let service = self.require_mut(service_id)?;
                service.unread_direct_message_count = direct;
                service.unread_indirect_message_count = indirect;
                self.update_badge();
            }
            channels::NOTIFICATION => {
                let payload = first_arg(channel, &args)?.clone();
                self.handle_notification(service_id, &payload)?;
            }
            channels::AVATAR => {
                let url = string_arg(channel, &args)?.to_string();
                let service = self.require(service_id)?;
                if service.icon_url != url && !service.has_custom_uploaded_icon {
                    self.update_service(
                        service_id,
                        ServiceData {
                            custom_icon_url: Some(url),
                            ..Default::default()
                        },
                    )
                    .await?;
                }
            }
            channels::NEW_WINDOW => {
                let url = string_arg(channel, &args)?.to_string();
                self.emit(StoreEvent::OpenExternalUrl { url });
            }
            channels::SET_SPELLCHECKER_LANGUAGE => {
                let locale = match string_arg(channel, &args) {
                    Ok(locale) => locale,
                    Err(e) => {
                        warn!("Did not receive locale: {}", e);
                        return Ok(());
                    }
                };
                let language = if locale == "reset" {
                    String::new()
                } else {
                    locale.to_string()
                };
                self.update_service(
                    service_id,
                    ServiceData {
                        spellchecker_language: Some(language),
                        ..Default::default()
                    },
                )
                .await?;
            }
            other => {
                debug!("Ignoring IPC channel '{}' from {}", other, service_id);
            }
        }

        Ok(())
    }

    fn handle_notification(&self, service_id: &str, payload: &Value) -> Result<()> {
        let settings = &self.settings;
        if settings.scheduled_dnd_enabled
            && is_in_timeframe(
                &settings.scheduled_dnd_start,
                &settings.scheduled_dnd_end,
                Local::now().time(),
            )?
        {
            debug!("Dropping notification from {} during scheduled DND", service_id);
            return Ok(());
        }

        let service = self.require(service_id)?;
        if !service.is_notification_enabled {
            return Ok(());
        }

        let options = payload.get("options").cloned().unwrap_or(Value::Null);
        let silent = service.is_muted
            || settings.is_app_muted
            || options.get("silent").and_then(Value::as_bool).unwrap_or(false);

        let (title, body, icon) = if settings.private_notifications {
            (
                format!("Notification from {}", service.name),
                String::new(),
                Some(defaults::PRIVATE_NOTIFICATION_ICON.to_string()),
            )
        } else {
            (
                payload
                    .get("title")
                    .and_then(Value::as_str)
                    .unwrap_or(&service.name)
                    .to_string(),
                options
                    .get("body")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                options.get("icon").and_then(Value::as_str).map(str::to_string),
            )
        };

        let notification = Notification {
            service_id: service_id.to_string(),
            notification_id: payload
                .get("notificationId")
                .and_then(Value::as_str)
                .map(str::to_string),
            title,
            body,
            icon,
            silent,
        };
        self.emit(StoreEvent::Notification(notification));
        Ok(())
    }

    /// Send a message to one service. Dropped when its webview is not attached.
    pub fn send_ipc_message(&self, service_id: &str, channel: &str, payload: Value) {
        match self.registry.get(service_id) {
            Some(service) if service.is_attached => {
                self.webview.send(service_id, channel, payload);
            }
            Some(_) => debug!("Webview of {} not attached, dropping '{}'", service_id, channel),
            None => debug!("Unknown service {}, dropping '{}'", service_id, channel),
        }
    }

    pub fn send_ipc_message_to_all(&self, channel: &str, payload: Value) {
        for service in self.registry.all() {
            self.send_ipc_message(&service.id, channel, payload.clone());
        }
    }

    pub fn share_settings_with_services(&self) {
        let mut settings = serde_json::to_value(&self.settings).unwrap_or(Value::Null);
        if let Value::Object(map) = &mut settings {
            map.insert("isDarkThemeActive".to_string(), json!(self.settings.dark_mode));
        }
        self.send_ipc_message_to_all(channels::SETTINGS_UPDATE, settings);
    }

    fn initialize_recipe(&self, service_id: &str) -> Result<()> {
        let service = self.require(service_id)?;
        if !service.is_attached {
            return Ok(());
        }

        debug!("Initialize recipe {} for {}", service.recipe_id, service.name);
        let mut shared = service.share_with_webview();
        if let Value::Object(map) = &mut shared {
            map.insert("version".to_string(), json!(env!("CARGO_PKG_VERSION")));
            if self.settings.enable_spellchecking {
                map.insert(
                    "spellcheckerDictionaries".to_string(),
                    json!(self.spellchecker_dictionaries(service.spellchecker_language.as_deref())),
                );
            }
        }
        self.webview.send(
            service_id,
            channels::INITIALIZE_RECIPE,
            json!([shared, { "id": service.recipe_id }]),
        );
        Ok(())
    }

    /// Dictionaries for a service: its own locale, else the app locale, then
    /// the app locale and the fallback as backups.
    fn spellchecker_dictionaries(&self, service_locale: Option<&str>) -> Vec<String> {
        let app_locale = self
            .settings
            .spellchecker_language
            .as_deref()
            .and_then(locale_by_fuzzy_identifier);
        let locale = service_locale
            .or(app_locale)
            .unwrap_or(defaults::FALLBACK_LOCALE);
        dictionary_chain(locale, app_locale)
    }

    fn start_recipe_polling(&mut self, service_id: &str, now: DateTime<Utc>) -> Result<()> {
        let service = self.require_mut(service_id)?;
        service.is_polling = true;
        // The heartbeat is measured from the moment polling starts
        PollHeartbeat::reset(service, now);
        if service.is_attached {
            PollHeartbeat::record_poll_sent(service, now);
            self.webview.send(service_id, channels::POLL, Value::Null);
        }
        Ok(())
    }

    /// Send `poll` to every attached service that said hello.
    pub fn poll_recipes(&mut self, now: DateTime<Utc>) {
        let webview = &self.webview;
        for service in self.registry.all_mut() {
            if service.is_polling && service.is_attached {
                webview.send(&service.id, channels::POLL, Value::Null);
                PollHeartbeat::record_poll_sent(service, now);
            }
        }
    }
}
