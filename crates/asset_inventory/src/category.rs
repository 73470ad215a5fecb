//! Category manager asset
//!
//! A project asset holding user-assigned categories, excluded category names and
//! favorites. It lives in the store like any other data asset but is never
//! listed or indexed itself.

use std::any::Any;

use anyhow::{anyhow, Context, Result};
use asset_db::{AssetGuid, AssetId, AssetStore, DataAsset};
use field_reflect::{FieldDescriptor, FieldKind, FieldValue, Reflect, ReflectError};
use serde::{Deserialize, Serialize};

pub const CATEGORY_MANAGER_TYPE: &str = "CategoryManager";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub asset: AssetGuid,
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryManager {
    pub entries: Vec<CategoryEntry>,
    pub excluded_categories: Vec<String>,
    pub favorite_categories: Vec<String>,
}

impl CategoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit category of an asset, ignoring blank entries
    pub fn category_of(&self, guid: &AssetGuid) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| &e.asset == guid)
            .map(|e| e.category.as_str())
            .filter(|c| !c.is_empty())
    }

    pub fn assign(&mut self, guid: AssetGuid, category: &str) {
        match self.entries.iter_mut().find(|e| e.asset == guid) {
            Some(entry) => entry.category = category.to_string(),
            None => self.entries.push(CategoryEntry {
                asset: guid,
                category: category.to_string(),
            }),
        }
    }

    /// Drop every assignment to `category` and un-favorite it
    pub fn remove_category(&mut self, category: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.category != category);
        self.favorite_categories.retain(|f| f != category);
        before - self.entries.len()
    }

    pub fn is_favorite(&self, category: &str) -> bool {
        self.favorite_categories.iter().any(|f| f == category)
    }

    /// Flip the favorite flag; returns the new state
    pub fn toggle_favorite(&mut self, category: &str) -> bool {
        if self.is_favorite(category) {
            self.favorite_categories.retain(|f| f != category);
            false
        } else {
            self.favorite_categories.push(category.to_string());
            true
        }
    }

    fn field_json(&self, name: &str) -> Option<String> {
        let json = match name {
            "entries" => serde_json::to_string(&self.entries),
            "excluded_categories" => serde_json::to_string(&self.excluded_categories),
            "favorite_categories" => serde_json::to_string(&self.favorite_categories),
            _ => return None,
        };
        json.ok()
    }
}

impl Reflect for CategoryManager {
    fn type_name(&self) -> &str {
        CATEGORY_MANAGER_TYPE
    }

    fn fields(&self) -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("entries", "List<CategoryEntry>", FieldKind::Generic),
            FieldDescriptor::new("excluded_categories", "List<string>", FieldKind::Generic),
            FieldDescriptor::new("favorite_categories", "List<string>", FieldKind::Generic),
        ]
    }

    fn get_field(&self, name: &str) -> Option<FieldValue> {
        self.field_json(name).map(|json| FieldValue::Opaque(FieldKind::Generic, json))
    }

    fn set_field(&mut self, name: &str, _value: FieldValue) -> Result<(), ReflectError> {
        if self.field(name).is_none() {
            return Err(ReflectError::UnknownField {
                type_name: CATEGORY_MANAGER_TYPE.to_string(),
                field: name.to_string(),
            });
        }
        Err(ReflectError::Rejected {
            field: name.to_string(),
            reason: "category data is edited through the inventory".to_string(),
        })
    }

    fn clone_boxed(&self) -> Box<dyn Reflect> {
        Box::new(self.clone())
    }

    fn reset_to_defaults(&mut self) -> Result<(), ReflectError> {
        *self = Self::default();
        Ok(())
    }

    fn shows_viewer_button(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The category manager asset as loaded from the store
#[derive(Debug, Clone)]
pub struct CategoryManagerHandle {
    asset: DataAsset,
    path: AssetId,
}

impl CategoryManagerHandle {
    /// Find the project's category manager, creating one at `default_path` if there is none
    pub fn load_or_create(store: &dyn AssetStore, default_path: &AssetId) -> Result<Self> {
        if let Some(path) = store.find_assets_of_type(CATEGORY_MANAGER_TYPE).into_iter().next() {
            let asset = store
                .load(&path)
                .with_context(|| format!("Failed to load category manager {}", path))?;
            let handle = Self { asset, path };
            handle.read(|_| ())?;
            tracing::debug!("Using category manager {}", handle.path);
            return Ok(handle);
        }

        let asset = DataAsset::new(CategoryManager::new());
        store
            .create(asset.clone(), default_path)
            .with_context(|| format!("Failed to create category manager at {}", default_path))?;
        store.save_assets();
        store.refresh();
        tracing::info!("Created category manager at {}", default_path);
        Ok(Self {
            asset,
            path: default_path.clone(),
        })
    }

    pub fn path(&self) -> &AssetId {
        &self.path
    }

    pub fn asset(&self) -> &DataAsset {
        &self.asset
    }

    pub fn read<R>(&self, f: impl FnOnce(&CategoryManager) -> R) -> Result<R> {
        let record = self.asset.read();
        let manager = record
            .as_any()
            .downcast_ref::<CategoryManager>()
            .ok_or_else(|| anyhow!("{} is a {}, not a category manager", self.path, record.type_name()))?;
        Ok(f(manager))
    }

    /// Mutate and persist
    pub fn update<R>(&self, store: &dyn AssetStore, f: impl FnOnce(&mut CategoryManager) -> R) -> Result<R> {
        let result = {
            let mut record = self.asset.write();
            let type_name = record.type_name().to_string();
            let manager = record
                .as_any_mut()
                .downcast_mut::<CategoryManager>()
                .ok_or_else(|| anyhow!("{} is a {}, not a category manager", self.path, type_name))?;
            f(manager)
        };
        store.mark_dirty(&self.asset);
        store.save_assets();
        Ok(result)
    }
}
