use asset_db::DataAsset;

/// Ordered set of selected live objects. The first entry is the bulk-edit source.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    items: Vec<DataAsset>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the object was already selected
    pub fn insert(&mut self, asset: DataAsset) -> bool {
        if self.contains(&asset) {
            return false;
        }
        self.items.push(asset);
        true
    }

    pub fn remove(&mut self, asset: &DataAsset) -> bool {
        let before = self.items.len();
        self.items.retain(|a| a != asset);
        self.items.len() != before
    }

    pub fn contains(&self, asset: &DataAsset) -> bool {
        self.items.iter().any(|a| a == asset)
    }

    /// Replace the whole selection, dropping duplicates
    pub fn replace(&mut self, assets: impl IntoIterator<Item = DataAsset>) {
        self.items.clear();
        for asset in assets {
            self.insert(asset);
        }
    }

    pub fn retain(&mut self, keep: impl FnMut(&DataAsset) -> bool) {
        self.items.retain(keep);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn as_slice(&self) -> &[DataAsset] {
        &self.items
    }

    pub fn to_vec(&self) -> Vec<DataAsset> {
        self.items.clone()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
