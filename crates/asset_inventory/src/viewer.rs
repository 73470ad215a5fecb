//! Inventory viewer controller
//!
//! Holds everything the inventory window shows: the category catalog, toggles,
//! the selection and the bulk edit session. Commands return `anyhow::Result`;
//! hosts wrap them in [`Viewer::guard`] so a failing command never takes the
//! editor session down.
//!
//! Work that has to wait until the store has settled (restoring the selection
//! after a rename, copy or delete, reloading after a cache refresh) is queued
//! and runs at the start of the next [`Viewer::tick`].

use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use asset_db::{AssetGuid, AssetId, AssetStore, DataAsset, ExclusionFilter, StoreError, SubscriptionId};
use asset_refs::{count_scene_references, ProgressSink, ReferenceCache, TracingProgress};
use bulk_edit::{ApplyOutcome, BulkEditSession, EditMode};
use field_reflect::FieldValue;

use crate::prefs::{load_json, save_json, CategoryToggleState, CategoryToggleStates, SelectedObjects};
use crate::{Catalog, CatalogOptions, CategoryManagerHandle, InventoryConfig, PreferenceStore, SelectionSet, TaskQueue};

pub struct Viewer {
    store: Arc<dyn AssetStore>,
    cache: Arc<ReferenceCache>,
    prefs: Arc<dyn PreferenceStore>,
    config: InventoryConfig,
    progress: Arc<dyn ProgressSink>,
    tasks: TaskQueue<Viewer>,
    manager: Option<CategoryManagerHandle>,
    catalog: Catalog,
    toggles: BTreeMap<String, bool>,
    excluded: Vec<String>,
    include_packages: bool,
    selection: SelectionSet,
    bulk: BulkEditSession,
    /// Focus request made before the viewer was opened
    pending_focus: Option<DataAsset>,
    subscription: Option<SubscriptionId>,
}

impl Viewer {
    pub fn new(
        store: Arc<dyn AssetStore>,
        cache: Arc<ReferenceCache>,
        prefs: Arc<dyn PreferenceStore>,
        config: InventoryConfig,
    ) -> Self {
        let include_packages = config.include_packages;
        Self {
            store,
            cache,
            prefs,
            config,
            progress: Arc::new(TracingProgress),
            tasks: TaskQueue::new(),
            manager: None,
            catalog: Catalog::default(),
            toggles: BTreeMap::new(),
            excluded: Vec::new(),
            include_packages,
            selection: SelectionSet::new(),
            bulk: BulkEditSession::new(),
            pending_focus: None,
            subscription: None,
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    // ---------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------

    /// Load the category manager and catalog, restore saved state and start
    /// following cache refreshes
    pub fn open(&mut self) -> Result<()> {
        if self.is_open() {
            return Ok(());
        }

        let manager = CategoryManagerHandle::load_or_create(self.store.as_ref(), &self.config.category_manager_id())?;
        // An index built before the manager was known still lists it
        if self.cache.index().ignore(manager.path().clone()) && self.cache.is_running() {
            self.cache.refresh();
        }
        self.excluded = manager.read(|m| m.excluded_categories.clone())?;
        self.manager = Some(manager);
        self.toggles.clear();
        self.reload()?;

        let tasks = self.tasks.clone();
        self.subscription = Some(self.cache.cache_refreshed().subscribe(move |_| {
            tasks.push(|viewer: &mut Viewer| {
                if viewer.is_open() {
                    viewer.guard("reload catalog", |v| v.reload());
                }
            });
        }));

        if let Err(e) = self.load_selection() {
            tracing::warn!("Could not restore selection: {:#}", e);
        }
        if let Err(e) = self.load_toggles() {
            tracing::warn!("Could not restore category toggles: {:#}", e);
        }

        if let Some(asset) = self.pending_focus.take() {
            self.focus_object(&asset);
        }
        tracing::info!("Inventory opened with {} categories", self.catalog.categories().len());
        Ok(())
    }

    /// Stop following cache refreshes and persist selection and toggles
    pub fn close(&mut self) -> Result<()> {
        if let Some(id) = self.subscription.take() {
            self.cache.cache_refreshed().unsubscribe(id);
        }
        self.save_selection()?;
        self.save_toggles()?;
        tracing::debug!("Inventory closed");
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.subscription.is_some()
    }

    /// Run deferred work queued since the last tick. Returns the number of tasks run.
    pub fn tick(&mut self) -> usize {
        let tasks = self.tasks.clone();
        tasks.drain(self)
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Run a command, logging (and swallowing) any error or panic
    pub fn guard<T>(&mut self, operation: &str, f: impl FnOnce(&mut Self) -> Result<T>) -> Option<T> {
        match std::panic::catch_unwind(AssertUnwindSafe(|| f(self))) {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                tracing::error!("{} failed: {:#}", operation, e);
                None
            }
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::error!("{} panicked: {}", operation, message);
                None
            }
        }
    }

    /// Rebuild the catalog from the store. The selection is cleared.
    pub fn reload(&mut self) -> Result<()> {
        let manager = self.manager()?;
        let snapshot = manager.read(|m| m.clone())?;
        let options = CatalogOptions {
            filter: ExclusionFilter::from(&self.config),
            include_packages: self.include_packages,
            project_root_prefix: self.config.project_root_prefix.clone(),
            progress_interval: self.config.catalog_progress_interval,
            manager_path: Some(manager.path().clone()),
        };
        self.catalog = Catalog::load(self.store.as_ref(), &snapshot, &options, self.progress.as_ref());
        self.selection.clear();
        self.catalog.prune(&mut self.toggles, &mut self.excluded);
        self.selection_changed();
        Ok(())
    }

    fn manager(&self) -> Result<&CategoryManagerHandle> {
        self.manager.as_ref().context("inventory is not open")
    }

    // ---------------------------------------------------------------------
    // Browsing
    // ---------------------------------------------------------------------

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    /// Listed, non-excluded categories matching `query`
    pub fn visible_categories(&self, query: &str) -> Vec<&str> {
        self.catalog
            .filter_categories(query)
            .into_iter()
            .filter(|c| !self.excluded.iter().any(|e| e == c))
            .collect()
    }

    pub fn excluded_categories(&self) -> &[String] {
        &self.excluded
    }

    pub fn is_category_toggled(&self, category: &str) -> bool {
        self.toggles.get(category).copied().unwrap_or(false)
    }

    pub fn displayed_objects(&self, query: &str) -> Vec<DataAsset> {
        self.catalog
            .displayed(&self.toggles, &self.excluded, query)
            .into_iter()
            .map(|e| e.asset.clone())
            .collect()
    }

    pub fn include_packages(&self) -> bool {
        self.include_packages
    }

    pub fn set_include_packages(&mut self, include: bool) -> Result<()> {
        if include != self.include_packages {
            self.include_packages = include;
            self.reload()?;
        }
        Ok(())
    }

    /// Assets that directly reference `asset`
    pub fn find_references(&self, asset: &DataAsset) -> Vec<AssetId> {
        self.cache.referencing_assets_of(asset)
    }

    pub fn scene_reference_count(&self, asset: &DataAsset, scene_objects: &[DataAsset]) -> usize {
        match self.store.path_of(asset) {
            Some(path) => count_scene_references(self.store.as_ref(), &path, scene_objects),
            None => 0,
        }
    }

    /// Whether an inspector should offer "open in inventory" for this object
    pub fn shows_viewer_button(asset: &DataAsset) -> bool {
        asset.read().shows_viewer_button()
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    pub fn selected(&self) -> &[DataAsset] {
        self.selection.as_slice()
    }

    /// True when the selection is too large to show in full
    pub fn is_selection_truncated(&self) -> bool {
        self.selection.len() > self.config.large_selection_threshold
    }

    /// The part of the selection that is shown
    pub fn visible_selection(&self) -> &[DataAsset] {
        let shown = self.selection.len().min(self.config.large_selection_threshold);
        &self.selection.as_slice()[..shown]
    }

    pub fn select(&mut self, asset: &DataAsset) -> bool {
        let changed = self.selection.insert(asset.clone());
        if changed {
            self.selection_changed();
        }
        changed
    }

    pub fn deselect(&mut self, asset: &DataAsset) -> bool {
        let changed = self.selection.remove(asset);
        if changed {
            self.selection_changed();
        }
        changed
    }

    pub fn select_all_displayed(&mut self, query: &str) {
        for asset in self.displayed_objects(query) {
            self.selection.insert(asset);
        }
        self.selection_changed();
    }

    /// Deselect every displayed object and leave bulk edit mode
    pub fn deselect_all_displayed(&mut self, query: &str) {
        for asset in self.displayed_objects(query) {
            self.selection.remove(&asset);
        }
        self.bulk.deselect_all();
        self.selection_changed();
    }

    /// Flip a category's toggle. Turning it off deselects its objects.
    pub fn toggle_category(&mut self, category: &str) -> bool {
        let on = !self.is_category_toggled(category);
        self.set_category_toggled(category, on);
        self.selection_changed();
        on
    }

    pub fn set_categories_toggled(&mut self, categories: &[&str], on: bool) {
        for category in categories {
            self.set_category_toggled(category, on);
        }
        self.selection_changed();
    }

    fn set_category_toggled(&mut self, category: &str, on: bool) {
        self.toggles.insert(category.to_string(), on);
        if !on {
            let objects: Vec<DataAsset> = self.catalog.objects_in(category).iter().map(|e| e.asset.clone()).collect();
            self.selection.retain(|a| !objects.contains(a));
        }
    }

    /// Show `asset` alone: clear selection and toggles, enable its category and
    /// select it. Before the viewer is open the request is kept for `open`.
    pub fn focus_object(&mut self, asset: &DataAsset) {
        if !self.is_open() {
            self.pending_focus = Some(asset.clone());
            return;
        }
        self.selection.clear();
        self.toggles.clear();
        let category = self.category_for(asset);
        self.toggles.insert(category, true);
        self.selection.insert(asset.clone());
        self.selection_changed();
    }

    fn category_for(&self, asset: &DataAsset) -> String {
        let explicit = self
            .store
            .path_of(asset)
            .and_then(|p| self.store.guid_of(&p))
            .and_then(|guid| {
                let manager = self.manager.as_ref()?;
                manager.read(|m| m.category_of(&guid).map(str::to_string)).ok().flatten()
            });
        explicit.unwrap_or_else(|| asset.type_name())
    }

    fn restore_selection(&mut self, assets: Vec<DataAsset>) {
        self.selection.replace(assets);
        self.selection_changed();
    }

    fn selection_changed(&mut self) {
        self.bulk.on_selection_changed(self.selection.as_slice());
        if self.is_selection_truncated() {
            tracing::debug!(
                "{} objects selected, showing the first {}",
                self.selection.len(),
                self.config.large_selection_threshold
            );
        }
    }

    // ---------------------------------------------------------------------
    // Bulk editing
    // ---------------------------------------------------------------------

    pub fn bulk(&self) -> &BulkEditSession {
        &self.bulk
    }

    pub fn set_bulk_edit(&mut self, enabled: bool) -> EditMode {
        self.bulk.set_enabled(enabled, self.selection.as_slice())
    }

    /// Edit a common field on the first selected object
    pub fn edit_common_field(&mut self, name: &str, value: FieldValue) -> Result<()> {
        self.bulk.edit_field(name, value, self.selection.as_slice())?;
        Ok(())
    }

    /// Copy pending edits from the first selected object to the rest
    pub fn apply_common_changes(&mut self) -> ApplyOutcome {
        self.bulk.apply_pending(self.selection.as_slice(), self.store.as_ref())
    }

    // ---------------------------------------------------------------------
    // Category management
    // ---------------------------------------------------------------------

    pub fn assign_selected_to_category(&mut self, category: &str) -> Result<()> {
        if category.is_empty() {
            bail!("Category name cannot be empty");
        }
        let guids: Vec<AssetGuid> = self
            .selection
            .as_slice()
            .iter()
            .filter_map(|a| self.store.path_of(a))
            .filter_map(|p| self.store.guid_of(&p))
            .collect();
        if guids.len() < self.selection.len() {
            tracing::warn!("{} selected object(s) are not saved assets", self.selection.len() - guids.len());
        }

        let count = guids.len();
        self.manager()?.update(self.store.as_ref(), |m| {
            for guid in guids {
                m.assign(guid, category);
            }
        })?;
        tracing::info!("Assigned {} object(s) to category '{}'", count, category);
        self.reload()
    }

    /// Remove a user-defined category; its objects fall back to their type name
    pub fn remove_category(&mut self, category: &str) -> Result<()> {
        if !self.catalog.is_user_defined(category) {
            bail!("'{}' is not a user-defined category", category);
        }
        let removed = self
            .manager()?
            .update(self.store.as_ref(), |m| m.remove_category(category))
            .with_context(|| format!("Failed to remove category '{}'", category))?;
        self.toggles.remove(category);
        self.excluded.retain(|e| e != category);
        tracing::info!("Removed category '{}' ({} assignment(s))", category, removed);
        self.reload()
    }

    pub fn exclude_category(&mut self, category: &str) -> Result<()> {
        if !self.excluded.iter().any(|e| e == category) {
            self.excluded.push(category.to_string());
        }
        self.toggles.remove(category);
        self.save_excluded()?;
        self.reload()
    }

    pub fn include_category(&mut self, category: &str) -> Result<()> {
        self.excluded.retain(|e| e != category);
        self.save_excluded()?;
        self.reload()
    }

    /// Returns the new favorite state
    pub fn toggle_favorite(&mut self, category: &str) -> Result<bool> {
        let favorite = self.manager()?.update(self.store.as_ref(), |m| m.toggle_favorite(category))?;
        self.reload()?;
        Ok(favorite)
    }

    fn save_excluded(&self) -> Result<()> {
        let excluded = self.excluded.clone();
        self.manager()?
            .update(self.store.as_ref(), |m| m.excluded_categories = excluded)?;
        tracing::debug!("Excluded categories saved");
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Asset operations
    // ---------------------------------------------------------------------

    fn persisted_path(&self, asset: &DataAsset) -> Result<AssetId> {
        self.store
            .path_of(asset)
            .ok_or(StoreError::NotPersisted)
            .context("Object is not saved as an asset")
    }

    /// Rename in place. The new name is made unique within its folder.
    pub fn rename(&mut self, asset: &DataAsset, new_name: &str) -> Result<AssetId> {
        if new_name.is_empty() {
            bail!("A new name is required");
        }
        let path = self.persisted_path(asset)?;
        if new_name == path.file_stem() {
            bail!("The new name is the same as the current name");
        }

        let previous = self.selection.to_vec();
        let unique = self.store.generate_unique_path(&path.with_stem(new_name));
        let new_path = self
            .store
            .rename(&path, unique.file_stem())
            .with_context(|| format!("Failed to rename {}", path))?;
        tracing::info!("Renamed {} to {}", path, new_path);

        let target = asset.clone();
        let renamed_path = new_path.clone();
        self.tasks.push(move |viewer: &mut Viewer| {
            viewer.store.refresh();
            let mut restored: Vec<DataAsset> = previous.into_iter().filter(|a| a != &target).collect();
            match viewer.store.load(&renamed_path) {
                Ok(renamed) => restored.push(renamed),
                Err(e) => tracing::warn!("Renamed asset {} could not be reloaded: {}", renamed_path, e),
            }
            viewer.restore_selection(restored);
        });
        Ok(new_path)
    }

    /// Duplicate next to the original as `<name>_Copy`
    pub fn copy(&mut self, asset: &DataAsset) -> Result<AssetId> {
        let path = self.persisted_path(asset)?;
        let proposed = path.with_stem(&format!("{}_Copy", path.file_stem()));
        let copy_path = self.store.generate_unique_path(&proposed);

        let previous = self.selection.to_vec();
        self.store
            .copy(&path, &copy_path)
            .with_context(|| format!("Failed to copy {}", path))?;
        tracing::info!("Copied {} to {}", path, copy_path);

        let loaded_path = copy_path.clone();
        self.tasks.push(move |viewer: &mut Viewer| {
            viewer.store.refresh();
            match viewer.store.load(&loaded_path) {
                Ok(copy) => {
                    let mut restored = previous;
                    restored.push(copy);
                    viewer.restore_selection(restored);
                }
                Err(e) => tracing::error!("Copied asset {} could not be loaded: {}", loaded_path, e),
            }
        });
        Ok(copy_path)
    }

    pub fn delete(&mut self, asset: &DataAsset) -> Result<()> {
        let path = self.persisted_path(asset)?;
        let previous = self.selection.to_vec();
        self.store
            .delete(&path)
            .with_context(|| format!("Failed to delete {}", path))?;
        tracing::info!("Deleted {}", path);

        let target = asset.clone();
        self.tasks.push(move |viewer: &mut Viewer| {
            viewer.store.refresh();
            viewer.restore_selection(previous.into_iter().filter(|a| a != &target).collect());
        });
        Ok(())
    }

    /// Restore every field to its default. The asset keeps its name.
    pub fn reset(&mut self, asset: &DataAsset) -> Result<()> {
        asset
            .write()
            .reset_to_defaults()
            .with_context(|| format!("Failed to reset {}", asset.type_name()))?;
        self.store.mark_dirty(asset);
        self.store.save_assets();
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Preferences
    // ---------------------------------------------------------------------

    pub fn save_selection(&self) -> Result<()> {
        let selected_guids = self
            .selection
            .as_slice()
            .iter()
            .filter_map(|a| self.store.path_of(a))
            .filter_map(|p| self.store.guid_of(&p))
            .map(|g| g.as_str().to_string())
            .collect();
        save_json(self.prefs.as_ref(), &self.config.selection_key, &SelectedObjects { selected_guids })
    }

    /// Restore the saved selection; guids that no longer resolve are dropped
    pub fn load_selection(&mut self) -> Result<()> {
        let Some(saved) = load_json::<SelectedObjects>(self.prefs.as_ref(), &self.config.selection_key)? else {
            return Ok(());
        };
        let assets: Vec<DataAsset> = saved
            .selected_guids
            .iter()
            .filter_map(|g| self.store.path_from_guid(&AssetGuid::new(g.as_str())))
            .filter_map(|p| self.store.load(&p).ok())
            .collect();
        if assets.len() < saved.selected_guids.len() {
            tracing::debug!(
                "Dropped {} saved selection entries that no longer resolve",
                saved.selected_guids.len() - assets.len()
            );
        }
        self.restore_selection(assets);
        Ok(())
    }

    pub fn save_toggles(&self) -> Result<()> {
        let category_states = self
            .toggles
            .iter()
            .map(|(name, on)| CategoryToggleState {
                category_name: name.clone(),
                is_toggled: *on,
            })
            .collect();
        save_json(
            self.prefs.as_ref(),
            &self.config.category_toggle_key,
            &CategoryToggleStates { category_states },
        )
    }

    pub fn load_toggles(&mut self) -> Result<()> {
        if let Some(saved) = load_json::<CategoryToggleStates>(self.prefs.as_ref(), &self.config.category_toggle_key)? {
            for state in saved.category_states {
                self.toggles.insert(state.category_name, state.is_toggled);
            }
        }
        Ok(())
    }
}

impl Drop for Viewer {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.cache.cache_refreshed().unsubscribe(id);
        }
    }
}
