//! Editor preference storage
//!
//! A flat string key/value store. Structured values are stored as JSON.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub trait PreferenceStore: Send + Sync {
    fn get_string(&self, key: &str) -> Option<String>;

    fn set_string(&self, key: &str, value: &str) -> Result<()>;

    fn has_key(&self, key: &str) -> bool {
        self.get_string(key).is_some()
    }
}

/// Store `value` as JSON under `key`
pub fn save_json<T: Serialize>(prefs: &dyn PreferenceStore, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value).with_context(|| format!("Failed to encode preference '{}'", key))?;
    prefs.set_string(key, &json)
}

/// Read a JSON value stored under `key`; `None` if the key is absent
pub fn load_json<T: DeserializeOwned>(prefs: &dyn PreferenceStore, key: &str) -> Result<Option<T>> {
    match prefs.get_string(key) {
        Some(json) => {
            let value = serde_json::from_str(&json).with_context(|| format!("Corrupt preference '{}'", key))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Persisted selection, as asset guids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedObjects {
    #[serde(rename = "selectedGuids", default)]
    pub selected_guids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryToggleState {
    #[serde(rename = "categoryName")]
    pub category_name: String,
    #[serde(rename = "isToggled")]
    pub is_toggled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryToggleStates {
    #[serde(rename = "categoryStates", default)]
    pub category_states: Vec<CategoryToggleState>,
}

#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn set_string(&self, key: &str, value: &str) -> Result<()> {
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences kept in a single JSON object on disk, rewritten on every change
pub struct FilePreferences {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl FilePreferences {
    /// Open (or start) the preference file at `path`
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read preferences {}", path.display()))?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)
                    .with_context(|| format!("Invalid preferences file {}", path.display()))?
            }
        } else {
            BTreeMap::new()
        };
        tracing::debug!("Loaded {} preference(s) from {}", values.len(), path.display());
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// Per-user default location
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "AssetInventory", "AssetInventory")
            .map(|dirs| dirs.config_dir().join("preferences.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(values).context("Failed to encode preferences")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write preferences {}", self.path.display()))
    }
}

impl PreferenceStore for FilePreferences {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn set_string(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.write();
        values.insert(key.to_string(), value.to_string());
        self.flush(&values)
    }
}
