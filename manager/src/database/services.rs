//! Service CRUD operations.

use super::{Database, ServiceRecord};
use crate::api::ServiceApi;
use crate::errors::ServiceError;
use crate::service::{Service, ServiceData};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

const SELECT_COLUMNS: &str = r#"
    SELECT id, recipe_id, name, icon_url, has_custom_uploaded_icon, team, custom_url,
           order_index, is_enabled, is_notification_enabled, is_badge_enabled,
           is_indirect_message_badge_enabled, is_muted, is_dark_mode_enabled,
           spellchecker_language, cache_cleared_at, created_at, updated_at
    FROM services
"#;

impl Database {
    pub async fn get_service_record(&self, service_id: &str) -> Result<Option<ServiceRecord>> {
        let query = format!("{} WHERE id = ?", SELECT_COLUMNS);
        let row = sqlx::query(&query)
            .bind(service_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(ServiceRecord::from_row))
    }

    pub async fn list_service_records(&self) -> Result<Vec<ServiceRecord>> {
        let query = format!("{} ORDER BY order_index ASC", SELECT_COLUMNS);
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(ServiceRecord::from_row).collect())
    }

    async fn store_service_record(&self, record: &ServiceRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO services (
                id, recipe_id, name, icon_url, has_custom_uploaded_icon, team, custom_url,
                order_index, is_enabled, is_notification_enabled, is_badge_enabled,
                is_indirect_message_badge_enabled, is_muted, is_dark_mode_enabled,
                spellchecker_language, cache_cleared_at, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.recipe_id)
        .bind(&record.name)
        .bind(&record.icon_url)
        .bind(record.has_custom_uploaded_icon)
        .bind(&record.team)
        .bind(&record.custom_url)
        .bind(record.order_index)
        .bind(record.is_enabled)
        .bind(record.is_notification_enabled)
        .bind(record.is_badge_enabled)
        .bind(record.is_indirect_message_badge_enabled)
        .bind(record.is_muted)
        .bind(record.is_dark_mode_enabled)
        .bind(&record.spellchecker_language)
        .bind(record.cache_cleared_at)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn require_service_record(&self, service_id: &str) -> Result<ServiceRecord> {
        self.get_service_record(service_id)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound {
                    service_id: service_id.to_string(),
                }
                .into()
            })
    }
}

#[async_trait]
impl ServiceApi for Database {
    async fn all(&self) -> Result<Vec<Service>> {
        let now = Utc::now();
        let records = self.list_service_records().await?;
        debug!("Loaded {} services from database", records.len());
        Ok(records.into_iter().map(|r| r.into_service(now)).collect())
    }

    async fn create(&self, recipe_id: &str, data: &ServiceData) -> Result<Service> {
        let now = Utc::now();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM services")
            .fetch_one(&self.pool)
            .await?;

        let mut service = Service::new(
            &Uuid::new_v4().to_string(),
            recipe_id,
            data.name.as_deref().unwrap_or(recipe_id),
            now,
        );
        service.order = count.max(0) as usize;
        service.apply(data);

        let record = ServiceRecord {
            id: service.id.clone(),
            recipe_id: service.recipe_id.clone(),
            name: service.name.clone(),
            icon_url: service.icon_url.clone(),
            has_custom_uploaded_icon: service.has_custom_uploaded_icon,
            team: service.team.clone(),
            custom_url: service.custom_url.clone(),
            order_index: count,
            is_enabled: service.is_enabled,
            is_notification_enabled: service.is_notification_enabled,
            is_badge_enabled: service.is_badge_enabled,
            is_indirect_message_badge_enabled: service.is_indirect_message_badge_enabled,
            is_muted: service.is_muted,
            is_dark_mode_enabled: service.is_dark_mode_enabled,
            spellchecker_language: service.spellchecker_language.clone(),
            cache_cleared_at: None,
            created_at: now,
            updated_at: now,
        };
        self.store_service_record(&record).await?;

        info!("Created service {} ({}) from recipe {}", service.name, service.id, recipe_id);
        Ok(service)
    }

    async fn update(&self, service_id: &str, data: &ServiceData) -> Result<Service> {
        let now = Utc::now();
        let mut record = self.require_service_record(service_id).await?;
        let cache_cleared_at = record.cache_cleared_at;
        let created_at = record.created_at;

        let mut service = record.clone().into_service(now);
        service.apply(data);

        record = ServiceRecord {
            id: service.id.clone(),
            recipe_id: service.recipe_id.clone(),
            name: service.name.clone(),
            icon_url: service.icon_url.clone(),
            has_custom_uploaded_icon: service.has_custom_uploaded_icon,
            team: service.team.clone(),
            custom_url: service.custom_url.clone(),
            order_index: record.order_index,
            is_enabled: service.is_enabled,
            is_notification_enabled: service.is_notification_enabled,
            is_badge_enabled: service.is_badge_enabled,
            is_indirect_message_badge_enabled: service.is_indirect_message_badge_enabled,
            is_muted: service.is_muted,
            is_dark_mode_enabled: service.is_dark_mode_enabled,
            spellchecker_language: service.spellchecker_language.clone(),
            cache_cleared_at,
            created_at,
            updated_at: now,
        };
        self.store_service_record(&record).await?;

        debug!("Updated service {}", service_id);
        Ok(service)
    }

    async fn delete(&self, service_id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM services WHERE id = ?")
            .bind(service_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound {
                service_id: service_id.to_string(),
            }
            .into());
        }

        info!("Deleted service {}", service_id);
        Ok(())
    }

    async fn reorder(&self, orders: &HashMap<String, usize>) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for (service_id, order) in orders {
            sqlx::query("UPDATE services SET order_index = ?, updated_at = ? WHERE id = ?")
                .bind(*order as i64)
                .bind(Utc::now())
                .bind(service_id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        debug!("Persisted order for {} services", orders.len());
        Ok(())
    }

    async fn clear_cache(&self, service_id: &str) -> Result<()> {
        let result = sqlx::query("UPDATE services SET cache_cleared_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(service_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound {
                service_id: service_id.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_assigns_sequential_orders() {
        let db = Database::in_memory().await.unwrap();

        let first = db.create("slack", &ServiceData::default()).await.unwrap();
        let second = db
            .create(
                "whatsapp",
                &ServiceData {
                    name: Some("Family".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(first.order, 0);
        assert_eq!(first.name, "slack");
        assert_eq!(second.order, 1);
        assert_eq!(second.name, "Family");
    }

    #[tokio::test]
    async fn test_update_unknown_service_is_not_found() {
        let db = Database::in_memory().await.unwrap();
        let err = db.update("missing", &ServiceData::default()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ServiceError>(),
            Some(ServiceError::NotFound { .. })
        ));
    }
}
