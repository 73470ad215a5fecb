//! # Asset References
//!
//! Answers "which assets reference this one?" by inverting the direct dependency
//! lists reported by an [`asset_db::AssetStore`].
//!
//! ## Features
//! - [`ReferenceIndex`]: full-rescan inverse dependency map with exclusion patterns
//! - [`ReferenceCache`]: keeps the index current on project changes and raises `cache_refreshed`
//! - [`count_scene_references`]: per-object reference counting for loaded scenes
//! - [`ProgressSink`]: progress reporting for long rebuilds
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use asset_db::MemoryAssetStore;
//! use asset_refs::{ReferenceCache, ReferenceIndex};
//!
//! let store = Arc::new(MemoryAssetStore::new());
//! store.insert_file("Assets/Scenes/Main.unity", &["Assets/Data/Goblin.asset"]);
//!
//! let cache = ReferenceCache::new(ReferenceIndex::new(store.clone()));
//! cache.start();
//!
//! let users = cache.referencing_assets(&"Assets/Data/Goblin.asset".into());
//! assert_eq!(users[0].as_str(), "Assets/Scenes/Main.unity");
//! ```

mod cache;
mod index;
mod progress;
mod scene;

pub use cache::ReferenceCache;
pub use index::{RebuildSummary, ReferenceIndex, DEFAULT_PROGRESS_INTERVAL};
pub use progress::{NullProgress, ProgressSink, TracingProgress};
pub use scene::count_scene_references;
