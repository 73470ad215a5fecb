//! In-memory asset store
//!
//! Keeps every asset in a sorted map. Object-reference fields of stored records
//! are reported as direct dependencies, alongside any explicitly declared ones,
//! so a record that references the same asset from two fields reports it twice.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use field_reflect::{FieldKind, ObjectRef, Reflect};
use parking_lot::{Mutex, RwLock};

use crate::{AssetGuid, AssetId, AssetStore, DataAsset, Signal, StoreError};

struct StoredAsset {
    guid: AssetGuid,
    record: Option<DataAsset>,
    dependencies: Vec<AssetId>,
    script: Option<AssetId>,
    read_error: Option<String>,
}

pub struct MemoryAssetStore {
    assets: RwLock<BTreeMap<AssetId, StoredAsset>>,
    dirty: Mutex<Vec<DataAsset>>,
    saved: Mutex<Vec<DataAsset>>,
    saves: AtomicUsize,
    refreshes: AtomicUsize,
    next_guid: AtomicU64,
    project_changed: Signal<()>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self {
            assets: RwLock::new(BTreeMap::new()),
            dirty: Mutex::new(Vec::new()),
            saved: Mutex::new(Vec::new()),
            saves: AtomicUsize::new(0),
            refreshes: AtomicUsize::new(0),
            next_guid: AtomicU64::new(1),
            project_changed: Signal::new(),
        }
    }

    fn allocate_guid(&self) -> AssetGuid {
        AssetGuid::new(format!("{:032x}", self.next_guid.fetch_add(1, Ordering::SeqCst)))
    }

    /// Seed a data asset. Its script defaults to `Assets/Scripts/<Type>.cs`.
    pub fn insert_record(&self, path: impl Into<AssetId>, record: impl Reflect) -> DataAsset {
        let asset = DataAsset::new(record);
        let script = AssetId::new(format!("Assets/Scripts/{}.cs", asset.type_name()));
        let stored = StoredAsset {
            guid: self.allocate_guid(),
            record: Some(asset.clone()),
            dependencies: Vec::new(),
            script: Some(script),
            read_error: None,
        };
        self.assets.write().insert(path.into(), stored);
        asset
    }

    /// Seed a non-data asset (scene, prefab, texture...) with explicit dependencies
    pub fn insert_file(&self, path: impl Into<AssetId>, dependencies: &[&str]) {
        let stored = StoredAsset {
            guid: self.allocate_guid(),
            record: None,
            dependencies: dependencies.iter().map(|d| AssetId::new(*d)).collect(),
            script: None,
            read_error: None,
        };
        self.assets.write().insert(path.into(), stored);
    }

    pub fn add_dependency(&self, path: &AssetId, dependency: impl Into<AssetId>) {
        if let Some(stored) = self.assets.write().get_mut(path) {
            stored.dependencies.push(dependency.into());
        }
    }

    pub fn set_script(&self, path: &AssetId, script: impl Into<AssetId>) {
        if let Some(stored) = self.assets.write().get_mut(path) {
            stored.script = Some(script.into());
        }
    }

    /// Make dependency enumeration fail for `path`
    pub fn fail_reads(&self, path: &AssetId, reason: &str) {
        if let Some(stored) = self.assets.write().get_mut(path) {
            stored.read_error = Some(reason.to_string());
        }
    }

    pub fn contains(&self, path: &AssetId) -> bool {
        self.assets.read().contains_key(path)
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    pub fn dirty_count(&self) -> usize {
        self.dirty.lock().len()
    }

    /// Whether `asset` was written by any `save_assets` call so far
    pub fn was_saved(&self, asset: &DataAsset) -> bool {
        self.saved.lock().iter().any(|s| s.ptr_eq(asset))
    }

    pub fn notify_project_changed(&self) {
        self.project_changed.emit(&());
    }

    fn record_references(record: &DataAsset) -> Vec<ObjectRef> {
        let record = record.read();
        record
            .fields()
            .into_iter()
            .filter(|f| f.kind == FieldKind::ObjectReference)
            .filter_map(|f| record.get_field(&f.name))
            .filter_map(|v| v.object_ref().cloned())
            .collect()
    }
}

impl Default for MemoryAssetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetStore for MemoryAssetStore {
    fn all_asset_paths(&self) -> Vec<AssetId> {
        self.assets.read().keys().cloned().collect()
    }

    fn direct_dependencies(&self, path: &AssetId) -> Result<Vec<AssetId>, StoreError> {
        let (mut dependencies, record) = {
            let assets = self.assets.read();
            let stored = assets.get(path).ok_or_else(|| StoreError::NotFound(path.clone()))?;
            if let Some(reason) = &stored.read_error {
                return Err(StoreError::ReadFailed {
                    path: path.clone(),
                    reason: reason.clone(),
                });
            }
            (stored.dependencies.clone(), stored.record.clone())
        };

        if let Some(record) = record {
            for reference in Self::record_references(&record) {
                if let Some(target) = self.resolve_reference(&reference) {
                    dependencies.push(target);
                }
            }
        }
        Ok(dependencies)
    }

    fn find_data_assets(&self) -> Vec<AssetId> {
        self.assets
            .read()
            .iter()
            .filter(|(_, s)| s.record.is_some())
            .map(|(p, _)| p.clone())
            .collect()
    }

    fn type_name_of(&self, path: &AssetId) -> Option<String> {
        let record = self.assets.read().get(path)?.record.clone()?;
        Some(record.type_name())
    }

    fn load(&self, path: &AssetId) -> Result<DataAsset, StoreError> {
        let assets = self.assets.read();
        let stored = assets.get(path).ok_or_else(|| StoreError::NotFound(path.clone()))?;
        stored
            .record
            .clone()
            .ok_or_else(|| StoreError::NotADataAsset(path.clone()))
    }

    fn path_of(&self, asset: &DataAsset) -> Option<AssetId> {
        self.assets
            .read()
            .iter()
            .find(|(_, s)| s.record.as_ref().is_some_and(|r| r.ptr_eq(asset)))
            .map(|(p, _)| p.clone())
    }

    fn guid_of(&self, path: &AssetId) -> Option<AssetGuid> {
        self.assets.read().get(path).map(|s| s.guid.clone())
    }

    fn path_from_guid(&self, guid: &AssetGuid) -> Option<AssetId> {
        self.assets
            .read()
            .iter()
            .find(|(_, s)| &s.guid == guid)
            .map(|(p, _)| p.clone())
    }

    fn script_path(&self, path: &AssetId) -> Option<AssetId> {
        self.assets.read().get(path)?.script.clone()
    }

    fn resolve_reference(&self, reference: &ObjectRef) -> Option<AssetId> {
        let guid = AssetGuid::new(reference.as_str());
        self.path_from_guid(&guid).or_else(|| Some(AssetId::from(reference)))
    }

    fn create(&self, asset: DataAsset, path: &AssetId) -> Result<(), StoreError> {
        {
            let mut assets = self.assets.write();
            if assets.contains_key(path) {
                return Err(StoreError::AlreadyExists(path.clone()));
            }
            let script = AssetId::new(format!("Assets/Scripts/{}.cs", asset.type_name()));
            assets.insert(
                path.clone(),
                StoredAsset {
                    guid: self.allocate_guid(),
                    record: Some(asset),
                    dependencies: Vec::new(),
                    script: Some(script),
                    read_error: None,
                },
            );
        }
        tracing::debug!("Created asset {}", path);
        self.project_changed.emit(&());
        Ok(())
    }

    fn mark_dirty(&self, asset: &DataAsset) {
        let mut dirty = self.dirty.lock();
        if !dirty.iter().any(|d| d.ptr_eq(asset)) {
            dirty.push(asset.clone());
        }
    }

    fn save_assets(&self) {
        let written = std::mem::take(&mut *self.dirty.lock());
        self.saves.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("Saved {} dirty asset(s)", written.len());
        let mut saved = self.saved.lock();
        for asset in written {
            if !saved.iter().any(|s| s.ptr_eq(&asset)) {
                saved.push(asset);
            }
        }
    }

    fn rename(&self, path: &AssetId, new_stem: &str) -> Result<AssetId, StoreError> {
        if new_stem.trim().is_empty() || new_stem.contains('/') {
            return Err(StoreError::InvalidName(new_stem.to_string()));
        }
        let new_path = path.with_stem(new_stem);
        {
            let mut assets = self.assets.write();
            if !assets.contains_key(path) {
                return Err(StoreError::NotFound(path.clone()));
            }
            if new_path == *path {
                return Ok(new_path);
            }
            if assets.contains_key(&new_path) {
                return Err(StoreError::AlreadyExists(new_path));
            }
            if let Some(stored) = assets.remove(path) {
                assets.insert(new_path.clone(), stored);
            }
        }
        tracing::debug!("Renamed {} -> {}", path, new_path);
        self.project_changed.emit(&());
        Ok(new_path)
    }

    fn copy(&self, from: &AssetId, to: &AssetId) -> Result<(), StoreError> {
        {
            let mut assets = self.assets.write();
            if assets.contains_key(to) {
                return Err(StoreError::AlreadyExists(to.clone()));
            }
            let source = assets.get(from).ok_or_else(|| StoreError::NotFound(from.clone()))?;
            let copy = StoredAsset {
                guid: self.allocate_guid(),
                record: source.record.as_ref().map(DataAsset::deep_clone),
                dependencies: source.dependencies.clone(),
                script: source.script.clone(),
                read_error: None,
            };
            assets.insert(to.clone(), copy);
        }
        tracing::debug!("Copied {} -> {}", from, to);
        self.project_changed.emit(&());
        Ok(())
    }

    fn delete(&self, path: &AssetId) -> Result<(), StoreError> {
        let removed = self.assets.write().remove(path);
        match removed {
            Some(stored) => {
                if let Some(record) = &stored.record {
                    self.dirty.lock().retain(|d| !d.ptr_eq(record));
                }
                tracing::debug!("Deleted {}", path);
                self.project_changed.emit(&());
                Ok(())
            }
            None => Err(StoreError::NotFound(path.clone())),
        }
    }

    fn generate_unique_path(&self, proposed: &AssetId) -> AssetId {
        let assets = self.assets.read();
        if !assets.contains_key(proposed) {
            return proposed.clone();
        }
        let stem = proposed.file_stem().to_string();
        (1u32..)
            .map(|n| proposed.with_stem(&format!("{} {}", stem, n)))
            .find(|candidate| !assets.contains_key(candidate))
            .unwrap_or_else(|| proposed.clone())
    }

    fn refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }

    fn project_changed(&self) -> &Signal<()> {
        &self.project_changed
    }
}
