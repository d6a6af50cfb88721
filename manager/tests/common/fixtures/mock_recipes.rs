//! In-memory recipe installer

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use service_manager::{RecipeCapabilities, RecipeInstaller};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
pub struct MockRecipeInstaller {
    installed: Mutex<HashSet<String>>,
    available: HashSet<String>,
    installs: Mutex<Vec<String>>,
    capabilities: Mutex<HashMap<String, RecipeCapabilities>>,
}

impl MockRecipeInstaller {
    /// Installer that can install any of `available`; nothing is installed yet.
    pub fn with_available(available: &[&str]) -> Self {
        Self {
            available: available.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn mark_installed(&self, recipe_id: &str) {
        self.installed.lock().unwrap().insert(recipe_id.to_string());
    }

    pub fn set_capabilities(&self, recipe_id: &str, capabilities: RecipeCapabilities) {
        self.capabilities
            .lock()
            .unwrap()
            .insert(recipe_id.to_string(), capabilities);
    }

    pub fn installs(&self) -> Vec<String> {
        self.installs.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecipeInstaller for MockRecipeInstaller {
    async fn is_installed(&self, recipe_id: &str) -> bool {
        self.installed.lock().unwrap().contains(recipe_id)
    }

    async fn install(&self, recipe_id: &str) -> Result<()> {
        self.installs.lock().unwrap().push(recipe_id.to_string());
        if !self.available.contains(recipe_id) {
            return Err(anyhow!("recipe {} not found in registry", recipe_id));
        }
        self.installed.lock().unwrap().insert(recipe_id.to_string());
        Ok(())
    }

    async fn capabilities(&self, recipe_id: &str) -> RecipeCapabilities {
        self.capabilities
            .lock()
            .unwrap()
            .get(recipe_id)
            .copied()
            .unwrap_or_default()
    }
}
