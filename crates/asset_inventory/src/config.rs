//! Inventory configuration
//!
//! Loaded from TOML. Every key is optional and falls back to its default.

use std::path::Path;

use anyhow::{Context, Result};
use asset_db::{AssetId, ExclusionFilter};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    pub excluded_path_fragments: Vec<String>,
    pub excluded_suffixes: Vec<String>,
    pub index_progress_interval: usize,
    pub catalog_progress_interval: usize,
    /// Also list assets whose defining script lives outside the project root
    pub include_packages: bool,
    pub project_root_prefix: String,
    pub category_manager_path: String,
    pub selection_key: String,
    pub category_toggle_key: String,
    /// Above this many selected objects only part of the selection is shown
    pub large_selection_threshold: usize,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        let filter = ExclusionFilter::default();
        Self {
            excluded_path_fragments: filter.fragments,
            excluded_suffixes: filter.suffixes,
            index_progress_interval: 500,
            catalog_progress_interval: 100,
            include_packages: false,
            project_root_prefix: "Assets/".to_string(),
            category_manager_path: "Assets/ScriptableObjectCategoryManager.asset".to_string(),
            selection_key: "SOV_SelectedObjects".to_string(),
            category_toggle_key: "SOV_CategoryToggleStates".to_string(),
            large_selection_threshold: 500,
        }
    }
}

impl InventoryConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse inventory config")?;
        Ok(config)
    }

    pub fn category_manager_id(&self) -> AssetId {
        AssetId::new(self.category_manager_path.as_str())
    }
}

impl From<&InventoryConfig> for ExclusionFilter {
    fn from(config: &InventoryConfig) -> Self {
        ExclusionFilter::new(config.excluded_path_fragments.clone(), config.excluded_suffixes.clone())
    }
}
