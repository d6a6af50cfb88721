//! Recipe installation
//!
//! A recipe is the integration definition a service is created from. A recipe
//! counts as installed once `<recipes_dir>/<id>/package.json` exists; installing
//! copies it from the bundled recipe source directory.

use crate::errors::RecipeError;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use glob::glob;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

const RECIPE_MANIFEST: &str = "package.json";

/// Optional service fields a recipe accepts, from the `config` block of its
/// manifest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeCapabilities {
    pub has_team_id: bool,
    pub has_custom_url: bool,
}

#[derive(Deserialize)]
struct RecipeManifest {
    #[serde(default)]
    config: RecipeCapabilities,
}

#[async_trait]
pub trait RecipeInstaller: Send + Sync {
    async fn is_installed(&self, recipe_id: &str) -> bool;

    async fn install(&self, recipe_id: &str) -> Result<()>;

    /// Capabilities of an installed recipe. Unknown recipes support nothing.
    async fn capabilities(&self, recipe_id: &str) -> RecipeCapabilities;
}

pub struct RecipeDirectory {
    source_dir: PathBuf,
    install_dir: PathBuf,
}

impl RecipeDirectory {
    pub fn new(source_dir: impl Into<PathBuf>, install_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            install_dir: install_dir.into(),
        }
    }

    pub fn recipe_path(&self, recipe_id: &str) -> PathBuf {
        self.install_dir.join(recipe_id)
    }

    /// Ids of all installed recipes, sorted.
    pub fn installed(&self) -> Result<Vec<String>> {
        let pattern = format!("{}/*/{}", self.install_dir.display(), RECIPE_MANIFEST);
        let mut ids = Vec::new();

        for entry in glob(&pattern).map_err(|e| anyhow!("Glob pattern error: {}", e))? {
            let path = entry.map_err(|e| anyhow!("Glob entry error: {}", e))?;
            if let Some(id) = path
                .parent()
                .and_then(|dir| dir.file_name())
                .and_then(|name| name.to_str())
            {
                ids.push(id.to_string());
            }
        }

        ids.sort();
        Ok(ids)
    }
}

async fn copy_dir(from: &Path, to: &Path) -> std::io::Result<()> {
    let mut pending = vec![(from.to_path_buf(), to.to_path_buf())];

    while let Some((src, dst)) = pending.pop() {
        fs::create_dir_all(&dst).await?;
        let mut entries = fs::read_dir(&src).await?;
        while let Some(entry) = entries.next_entry().await? {
            let target = dst.join(entry.file_name());
            if entry.file_type().await?.is_dir() {
                pending.push((entry.path(), target));
            } else {
                fs::copy(entry.path(), target).await?;
            }
        }
    }

    Ok(())
}

#[async_trait]
impl RecipeInstaller for RecipeDirectory {
    async fn is_installed(&self, recipe_id: &str) -> bool {
        fs::try_exists(self.recipe_path(recipe_id).join(RECIPE_MANIFEST))
            .await
            .unwrap_or(false)
    }

    async fn install(&self, recipe_id: &str) -> Result<()> {
        let source = self.source_dir.join(recipe_id);
        if !fs::try_exists(source.join(RECIPE_MANIFEST)).await.unwrap_or(false) {
            return Err(RecipeError::NotAvailable {
                recipe_id: recipe_id.to_string(),
            }
            .into());
        }

        let target = self.recipe_path(recipe_id);
        debug!("Copying recipe {} to {}", source.display(), target.display());
        copy_dir(&source, &target)
            .await
            .map_err(|e| RecipeError::CopyFailed {
                recipe_id: recipe_id.to_string(),
                reason: e.to_string(),
            })?;

        info!("Recipe \"{}\" installed", recipe_id);
        Ok(())
    }

    async fn capabilities(&self, recipe_id: &str) -> RecipeCapabilities {
        let path = self.recipe_path(recipe_id).join(RECIPE_MANIFEST);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) => {
                debug!("No manifest for recipe {}: {}", recipe_id, e);
                return RecipeCapabilities::default();
            }
        };

        match serde_json::from_str::<RecipeManifest>(&content) {
            Ok(manifest) => manifest.config,
            Err(e) => {
                warn!("Invalid manifest {}: {}", path.display(), e);
                RecipeCapabilities::default()
            }
        }
    }
}
