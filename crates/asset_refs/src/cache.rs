//! Reference cache service
//!
//! Owns a [`ReferenceIndex`] and keeps it in step with the project: a full
//! rebuild on [`ReferenceCache::start`] and on every project-changed signal.

use std::sync::{Arc, Weak};

use asset_db::{AssetId, DataAsset, Signal, SubscriptionId};
use parking_lot::Mutex;

use crate::{RebuildSummary, ReferenceIndex};

pub struct ReferenceCache {
    index: ReferenceIndex,
    subscription: Mutex<Option<SubscriptionId>>,
    cache_refreshed: Signal<()>,
}

impl ReferenceCache {
    pub fn new(index: ReferenceIndex) -> Arc<Self> {
        Arc::new(Self {
            index,
            subscription: Mutex::new(None),
            cache_refreshed: Signal::new(),
        })
    }

    /// Build the index and start listening for project changes.
    /// Calling it again while running only rebuilds.
    pub fn start(self: &Arc<Self>) {
        {
            let mut subscription = self.subscription.lock();
            if subscription.is_none() {
                let weak: Weak<Self> = Arc::downgrade(self);
                let id = self.index.store().project_changed().subscribe(move |_| {
                    if let Some(cache) = weak.upgrade() {
                        cache.refresh();
                    }
                });
                *subscription = Some(id);
                tracing::debug!("Reference cache subscribed to project changes");
            }
        }
        self.refresh();
    }

    /// Stop listening for project changes. The last index stays readable.
    pub fn stop(&self) {
        if let Some(id) = self.subscription.lock().take() {
            self.index.store().project_changed().unsubscribe(id);
            tracing::debug!("Reference cache stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.subscription.lock().is_some()
    }

    /// Rebuild now and raise `cache_refreshed`
    pub fn refresh(&self) -> RebuildSummary {
        let summary = self.index.rebuild();
        self.cache_refreshed.emit(&());
        summary
    }

    pub fn cache_refreshed(&self) -> &Signal<()> {
        &self.cache_refreshed
    }

    pub fn index(&self) -> &ReferenceIndex {
        &self.index
    }

    pub fn referencing_assets(&self, id: &AssetId) -> Vec<AssetId> {
        self.index.referencing_assets(id)
    }

    pub fn referencing_assets_of(&self, asset: &DataAsset) -> Vec<AssetId> {
        self.index.referencing_assets_of(asset)
    }
}

impl Drop for ReferenceCache {
    fn drop(&mut self) {
        self.stop();
    }
}
