//! Reverse dependency index
//!
//! Built by scanning every asset once and inverting its direct dependency list.
//! The index is a derived cache: it is always rebuilt from scratch, never patched.

use std::collections::HashSet;
use std::sync::Arc;

use asset_db::{AssetId, AssetStore, DataAsset, ExclusionFilter};
use dashmap::DashMap;
use itertools::Itertools;
use parking_lot::RwLock;

use crate::{ProgressSink, TracingProgress};

pub const DEFAULT_PROGRESS_INTERVAL: usize = 500;

/// Counters from one rebuild
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebuildSummary {
    pub scanned: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct ReferenceIndex {
    store: Arc<dyn AssetStore>,
    /// dependency -> assets that depend on it (may hold duplicates)
    inbound: DashMap<AssetId, Vec<AssetId>>,
    filter: ExclusionFilter,
    /// Tool-owned assets that never take part in the index
    ignored: RwLock<HashSet<AssetId>>,
    progress_interval: usize,
    progress: Arc<dyn ProgressSink>,
}

impl ReferenceIndex {
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        Self {
            store,
            inbound: DashMap::new(),
            filter: ExclusionFilter::default(),
            ignored: RwLock::new(HashSet::new()),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            progress: Arc::new(TracingProgress),
        }
    }

    pub fn with_filter(mut self, filter: ExclusionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Report progress every `interval` records (clamped to at least 1)
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = sink;
        self
    }

    /// Leave `path` out of future rebuilds. Returns false if it was already ignored.
    pub fn ignore(&self, path: impl Into<AssetId>) -> bool {
        self.ignored.write().insert(path.into())
    }

    pub fn filter(&self) -> &ExclusionFilter {
        &self.filter
    }

    pub fn store(&self) -> &Arc<dyn AssetStore> {
        &self.store
    }

    /// Clear and repopulate the index from the store
    pub fn rebuild(&self) -> RebuildSummary {
        self.inbound.clear();

        let paths = self.store.all_asset_paths();
        let total = paths.len();
        let ignored = self.ignored.read().clone();
        let mut summary = RebuildSummary::default();

        for (i, path) in paths.iter().enumerate() {
            if i % self.progress_interval == 0 {
                self.progress.report(
                    &format!("Processing {}/{} assets...", i, total),
                    i as f32 / total as f32,
                );
            }

            if self.filter.is_excluded(path) || ignored.contains(path) {
                summary.skipped += 1;
                continue;
            }

            match self.store.direct_dependencies(path) {
                Ok(dependencies) => {
                    for dependency in dependencies {
                        self.inbound.entry(dependency).or_default().push(path.clone());
                    }
                    summary.scanned += 1;
                }
                Err(e) => {
                    tracing::warn!("Skipping {} while building reference index: {}", path, e);
                    summary.failed += 1;
                }
            }
        }

        self.progress.clear();
        tracing::info!(
            "Reference index rebuilt: {} scanned, {} skipped, {} failed, {} referenced assets",
            summary.scanned,
            summary.skipped,
            summary.failed,
            self.inbound.len()
        );
        summary
    }

    /// Assets that directly reference `id`, without duplicates, in first-seen order
    pub fn referencing_assets(&self, id: &AssetId) -> Vec<AssetId> {
        self.inbound
            .get(id)
            .map(|entry| entry.iter().unique().cloned().collect())
            .unwrap_or_default()
    }

    /// Same as [`Self::referencing_assets`] for a live object; empty if it is not persisted
    pub fn referencing_assets_of(&self, asset: &DataAsset) -> Vec<AssetId> {
        match self.store.path_of(asset) {
            Some(path) => self.referencing_assets(&path),
            None => Vec::new(),
        }
    }

    /// Number of assets with at least one inbound reference
    pub fn len(&self) -> usize {
        self.inbound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inbound.is_empty()
    }
}
