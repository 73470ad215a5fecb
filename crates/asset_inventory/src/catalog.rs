//! Categorised listing of the project's data assets

use std::collections::{BTreeMap, HashMap, HashSet};

use asset_db::{AssetGuid, AssetId, AssetStore, DataAsset, ExclusionFilter};
use asset_refs::ProgressSink;

use crate::CategoryManager;

/// Settings that decide which data assets are listed
#[derive(Debug, Clone)]
pub struct CatalogOptions {
    pub filter: ExclusionFilter,
    pub include_packages: bool,
    pub project_root_prefix: String,
    pub progress_interval: usize,
    /// The category manager's own asset, never listed
    pub manager_path: Option<AssetId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub asset: DataAsset,
    pub path: AssetId,
    pub guid: Option<AssetGuid>,
}

impl CatalogEntry {
    /// Display name: the file stem of the asset
    pub fn name(&self) -> &str {
        self.path.file_stem()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    categories: Vec<String>,
    objects: HashMap<String, Vec<CatalogEntry>>,
    user_defined: HashSet<String>,
}

impl Catalog {
    pub fn load(
        store: &dyn AssetStore,
        manager: &CategoryManager,
        options: &CatalogOptions,
        progress: &dyn ProgressSink,
    ) -> Catalog {
        progress.report("Scanning project for data assets...", 0.0);

        let mut catalog = Catalog::default();
        let paths = store.find_data_assets();
        let total = paths.len();
        let interval = options.progress_interval.max(1);

        for (i, path) in paths.into_iter().enumerate() {
            if i % interval == 0 {
                progress.report(&format!("Processing {}/{}...", i, total), i as f32 / total as f32);
            }

            if options.filter.is_excluded(&path) || options.manager_path.as_ref() == Some(&path) {
                continue;
            }
            let asset = match store.load(&path) {
                Ok(asset) => asset,
                Err(e) => {
                    tracing::debug!("Not listing {}: {}", path, e);
                    continue;
                }
            };
            let Some(script) = store.script_path(&path) else {
                tracing::debug!("Not listing {}: no defining script", path);
                continue;
            };
            if !options.include_packages && !script.starts_with(&options.project_root_prefix) {
                continue;
            }

            let guid = store.guid_of(&path);
            let category = match guid.as_ref().and_then(|g| manager.category_of(g)) {
                Some(category) => {
                    catalog.user_defined.insert(category.to_string());
                    category.to_string()
                }
                None => asset.type_name(),
            };

            if !catalog.objects.contains_key(&category) {
                catalog.categories.push(category.clone());
            }
            catalog
                .objects
                .entry(category)
                .or_default()
                .push(CatalogEntry { asset, path, guid });
        }

        catalog.objects.retain(|_, entries| !entries.is_empty());
        let objects = &catalog.objects;
        catalog.categories.retain(|c| objects.contains_key(c));

        // Favorites first, then by name
        catalog
            .categories
            .sort_by(|a, b| manager.is_favorite(b).cmp(&manager.is_favorite(a)).then_with(|| a.cmp(b)));

        progress.clear();
        tracing::info!(
            "Catalog loaded: {} object(s) in {} categories",
            catalog.len(),
            catalog.categories.len()
        );
        catalog
    }

    /// Category names in display order
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Categories whose name contains `query`, ignoring case
    pub fn filter_categories(&self, query: &str) -> Vec<&str> {
        let query = query.to_lowercase();
        self.categories
            .iter()
            .filter(|c| c.to_lowercase().contains(&query))
            .map(String::as_str)
            .collect()
    }

    pub fn contains_category(&self, category: &str) -> bool {
        self.objects.contains_key(category)
    }

    pub fn objects_in(&self, category: &str) -> &[CatalogEntry] {
        self.objects.get(category).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_user_defined(&self, category: &str) -> bool {
        self.user_defined.contains(category)
    }

    pub fn entry_for(&self, asset: &DataAsset) -> Option<&CatalogEntry> {
        self.objects.values().flatten().find(|e| &e.asset == asset)
    }

    pub fn category_of(&self, asset: &DataAsset) -> Option<&str> {
        self.objects
            .iter()
            .find(|(_, entries)| entries.iter().any(|e| &e.asset == asset))
            .map(|(c, _)| c.as_str())
    }

    /// Objects of every toggled-on, non-excluded category in category order,
    /// without duplicates, optionally narrowed by a case-insensitive name search
    pub fn displayed(&self, toggles: &BTreeMap<String, bool>, excluded: &[String], query: &str) -> Vec<&CatalogEntry> {
        let query = query.to_lowercase();
        let mut seen: Vec<&CatalogEntry> = Vec::new();
        for category in &self.categories {
            if excluded.contains(category) || !toggles.get(category).copied().unwrap_or(false) {
                continue;
            }
            for entry in self.objects_in(category) {
                if !query.is_empty() && !entry.name().to_lowercase().contains(&query) {
                    continue;
                }
                if !seen.iter().any(|s| s.asset == entry.asset) {
                    seen.push(entry);
                }
            }
        }
        seen
    }

    /// Forget toggles for missing or excluded categories and keep only excluded
    /// names that still exist
    pub fn prune(&self, toggles: &mut BTreeMap<String, bool>, excluded: &mut Vec<String>) {
        toggles.retain(|name, _| self.contains_category(name) && !excluded.contains(name));
        excluded.retain(|name| self.contains_category(name));
    }

    /// Total number of listed objects
    pub fn len(&self) -> usize {
        self.objects.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
