//! # Asset Inventory
//!
//! Editor-side inventory of a project's data assets: categorised browsing,
//! multi-selection, bulk field editing, reference lookups and asset operations.
//!
//! ## Features
//! - [`Viewer`]: the controller tying catalog, selection, bulk edit and preferences together
//! - [`Catalog`]: data assets grouped by user category or type, favorites first
//! - [`CategoryManager`]: the persisted category asset
//! - [`PreferenceStore`]: in-memory and JSON-file preference backends
//! - [`TaskQueue`]: work deferred to the next viewer tick
//! - [`InventoryConfig`]: TOML configuration
//! - [`logging::init`]: tracing subscriber setup
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use asset_db::MemoryAssetStore;
//! use asset_inventory::{InventoryConfig, MemoryPreferences, Viewer};
//! use asset_refs::{ReferenceCache, ReferenceIndex};
//! use field_reflect::{DynamicRecord, RecordSchema};
//!
//! let store = Arc::new(MemoryAssetStore::new());
//! let schema = Arc::new(RecordSchema::builder("Enemy").build());
//! store.insert_record("Assets/Data/Goblin.asset", DynamicRecord::new(schema));
//!
//! let cache = ReferenceCache::new(ReferenceIndex::new(store.clone()));
//! cache.start();
//!
//! let mut viewer = Viewer::new(store, cache, Arc::new(MemoryPreferences::new()), InventoryConfig::default());
//! viewer.open().unwrap();
//! viewer.toggle_category("Enemy");
//! assert_eq!(viewer.displayed_objects("gob").len(), 1);
//! ```

mod catalog;
mod category;
mod config;
pub mod logging;
mod prefs;
mod selection;
mod tasks;
mod viewer;

pub use catalog::{Catalog, CatalogEntry, CatalogOptions};
pub use category::{CategoryEntry, CategoryManager, CategoryManagerHandle, CATEGORY_MANAGER_TYPE};
pub use config::InventoryConfig;
pub use prefs::{
    load_json, save_json, CategoryToggleState, CategoryToggleStates, FilePreferences, MemoryPreferences,
    PreferenceStore, SelectedObjects,
};
pub use selection::SelectionSet;
pub use tasks::TaskQueue;
pub use viewer::Viewer;
