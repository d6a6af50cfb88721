//! Store wired to an in-memory database and recording collaborators

use super::{MockPartitionStore, MockRecipeInstaller, MockWebviewHost};
use service_manager::{
    AppSettings, Database, RecipeCapabilities, ServiceData, ServicesStore, StoreEvent,
};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

pub struct TestStore {
    pub store: ServicesStore,
    pub events: UnboundedReceiver<StoreEvent>,
    pub database: Arc<Database>,
    pub webview: Arc<MockWebviewHost>,
    pub partitions: Arc<MockPartitionStore>,
    pub recipes: Arc<MockRecipeInstaller>,
}

impl TestStore {
    pub async fn new() -> Self {
        Self::with_settings(AppSettings::default()).await
    }

    pub async fn with_settings(settings: AppSettings) -> Self {
        let database = Arc::new(Database::in_memory().await.expect("in-memory database"));
        let webview = Arc::new(MockWebviewHost::new());
        let partitions = Arc::new(MockPartitionStore::new());
        let recipes = Arc::new(MockRecipeInstaller::with_available(&[
            super::recipes::SLACK,
            super::recipes::WHATSAPP,
            super::recipes::TELEGRAM,
        ]));
        // Slack teams can also be reached through a custom url
        recipes.set_capabilities(
            super::recipes::SLACK,
            RecipeCapabilities {
                has_team_id: true,
                has_custom_url: true,
            },
        );

        let (store, events) = ServicesStore::new(
            settings,
            database.clone(),
            webview.clone(),
            partitions.clone(),
            recipes.clone(),
        );

        Self {
            store,
            events,
            database,
            webview,
            partitions,
            recipes,
        }
    }

    /// Create one service per name, all from the slack recipe. Returns ids.
    pub async fn with_services(mut self, names: &[&str]) -> (Self, Vec<String>) {
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            let service = self
                .store
                .create_service(
                    super::recipes::SLACK,
                    ServiceData {
                        name: Some(name.to_string()),
                        ..Default::default()
                    },
                )
                .await
                .expect("create service");
            ids.push(service.id);
        }
        (self, ids)
    }

    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }

    pub fn names(&self) -> Vec<String> {
        self.store.all().iter().map(|s| s.name.clone()).collect()
    }
}
