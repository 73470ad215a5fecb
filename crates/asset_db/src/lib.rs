//! # Asset Database
//!
//! Identifiers, live handles and the store seam shared by the reference index,
//! the bulk field editor and the inventory viewer.
//!
//! ## Features
//! - [`AssetId`] / [`AssetGuid`]: path and guid identifiers
//! - [`DataAsset`]: identity-compared handle to a live [`field_reflect::Reflect`] record
//! - [`AssetStore`]: everything the tools need from the host asset pipeline
//! - [`MemoryAssetStore`]: a complete in-memory store
//! - [`Signal`]: synchronous change notifications
//! - [`ExclusionFilter`]: path patterns that are never indexed or browsed
//!
//! ## Example
//! ```rust
//! use asset_db::{AssetStore, MemoryAssetStore};
//!
//! let store = MemoryAssetStore::new();
//! store.insert_file("Assets/Scenes/Main.unity", &["Assets/Data/Goblin.asset"]);
//!
//! let deps = store.direct_dependencies(&"Assets/Scenes/Main.unity".into()).unwrap();
//! assert_eq!(deps[0].as_str(), "Assets/Data/Goblin.asset");
//! ```

mod asset;
mod events;
mod filter;
mod memory;
mod store;

pub use asset::{AssetGuid, AssetId, DataAsset};
pub use events::{Signal, SubscriptionId};
pub use filter::ExclusionFilter;
pub use memory::MemoryAssetStore;
pub use store::{AssetStore, StoreError};
