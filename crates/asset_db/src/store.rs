//! The asset store seam
//!
//! Everything the inventory needs from the host's asset database goes through
//! [`AssetStore`]. Hosts implement it over their own pipeline; tests and
//! embedders can use [`crate::MemoryAssetStore`].

use field_reflect::ObjectRef;

use crate::{AssetGuid, AssetId, DataAsset, Signal};

/// Errors reported by an asset store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("asset not found: {0}")]
    NotFound(AssetId),

    #[error("no asset with guid {0}")]
    GuidNotFound(AssetGuid),

    #[error("object is not saved as an asset")]
    NotPersisted,

    #[error("an asset already exists at {0}")]
    AlreadyExists(AssetId),

    #[error("asset {0} holds no data record")]
    NotADataAsset(AssetId),

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: AssetId, reason: String },

    #[error("invalid asset name '{0}'")]
    InvalidName(String),
}

pub trait AssetStore: Send + Sync {
    /// Every asset path in the project, in a stable order
    fn all_asset_paths(&self) -> Vec<AssetId>;

    /// Assets referenced directly (one level deep) by `path`.
    ///
    /// An asset referenced through several fields may be reported more than once.
    fn direct_dependencies(&self, path: &AssetId) -> Result<Vec<AssetId>, StoreError>;

    /// Paths of assets that hold a data record
    fn find_data_assets(&self) -> Vec<AssetId>;

    /// Data assets whose record type is `type_name`
    fn find_assets_of_type(&self, type_name: &str) -> Vec<AssetId> {
        self.find_data_assets()
            .into_iter()
            .filter(|p| self.type_name_of(p).as_deref() == Some(type_name))
            .collect()
    }

    fn type_name_of(&self, path: &AssetId) -> Option<String>;

    fn load(&self, path: &AssetId) -> Result<DataAsset, StoreError>;

    /// Path of a live object, or `None` if it is not persisted
    fn path_of(&self, asset: &DataAsset) -> Option<AssetId>;

    fn guid_of(&self, path: &AssetId) -> Option<AssetGuid>;

    fn path_from_guid(&self, guid: &AssetGuid) -> Option<AssetId>;

    /// Location of the script that defines the record's type
    fn script_path(&self, path: &AssetId) -> Option<AssetId>;

    /// Asset an object-reference field points at. References may hold either a
    /// path or a guid; the default treats them as paths.
    fn resolve_reference(&self, reference: &ObjectRef) -> Option<AssetId> {
        Some(AssetId::from(reference))
    }

    /// Persist a new live object at `path`
    fn create(&self, asset: DataAsset, path: &AssetId) -> Result<(), StoreError>;

    fn mark_dirty(&self, asset: &DataAsset);

    /// Write every dirty asset
    fn save_assets(&self);

    /// Rename in place, keeping directory and extension. Returns the new path.
    fn rename(&self, path: &AssetId, new_stem: &str) -> Result<AssetId, StoreError>;

    fn copy(&self, from: &AssetId, to: &AssetId) -> Result<(), StoreError>;

    fn delete(&self, path: &AssetId) -> Result<(), StoreError>;

    /// `proposed` if free, otherwise a numbered variant that is not taken
    fn generate_unique_path(&self, proposed: &AssetId) -> AssetId;

    /// Re-import pending changes from disk
    fn refresh(&self);

    /// Raised whenever the set or content of project assets changes
    fn project_changed(&self) -> &Signal<()>;
}
