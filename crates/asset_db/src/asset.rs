//! Asset identifiers and live asset handles

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use field_reflect::{ObjectRef, Reflect};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::{Deserialize, Serialize};

/// Stable path-like identifier of an asset, e.g. `Assets/Data/Goblin.asset`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into().replace('\\', "/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Directory part without the trailing slash (empty at the root)
    pub fn directory(&self) -> &str {
        match self.0.rfind('/') {
            Some(i) => &self.0[..i],
            None => "",
        }
    }

    pub fn file_name(&self) -> &str {
        match self.0.rfind('/') {
            Some(i) => &self.0[i + 1..],
            None => &self.0,
        }
    }

    /// File name without extension; this is the asset's display name
    pub fn file_stem(&self) -> &str {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => name,
            Some(i) => &name[..i],
        }
    }

    /// Extension including the leading dot, or empty
    pub fn extension(&self) -> &str {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => "",
            Some(i) => &name[i..],
        }
    }

    /// Same directory and extension, different stem
    pub fn with_stem(&self, stem: &str) -> AssetId {
        let dir = self.directory();
        if dir.is_empty() {
            AssetId::new(format!("{}{}", stem, self.extension()))
        } else {
            AssetId::new(format!("{}/{}{}", dir, stem, self.extension()))
        }
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        AssetId::new(s)
    }
}

impl From<&AssetId> for ObjectRef {
    fn from(id: &AssetId) -> Self {
        ObjectRef::new(id.as_str())
    }
}

impl From<&ObjectRef> for AssetId {
    fn from(r: &ObjectRef) -> Self {
        AssetId::new(r.as_str())
    }
}

/// GUID assigned by the store; survives renames
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetGuid(String);

impl AssetGuid {
    pub fn new(guid: impl Into<String>) -> Self {
        Self(guid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle to a live data record.
///
/// Handles compare by identity: two handles are equal only when they point at
/// the same live instance, regardless of field values.
#[derive(Clone)]
pub struct DataAsset {
    record: Arc<RwLock<Box<dyn Reflect>>>,
}

impl DataAsset {
    pub fn new<R: Reflect>(record: R) -> Self {
        Self::from_boxed(Box::new(record))
    }

    pub fn from_boxed(record: Box<dyn Reflect>) -> Self {
        Self {
            record: Arc::new(RwLock::new(record)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Box<dyn Reflect>> {
        self.record.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Box<dyn Reflect>> {
        self.record.write()
    }

    pub fn type_name(&self) -> String {
        self.record.read().type_name().to_string()
    }

    pub fn ptr_eq(&self, other: &DataAsset) -> bool {
        Arc::ptr_eq(&self.record, &other.record)
    }

    /// Independent copy of the underlying record
    pub fn deep_clone(&self) -> DataAsset {
        DataAsset::from_boxed(self.record.read().clone_boxed())
    }

    fn addr(&self) -> usize {
        Arc::as_ptr(&self.record) as *const () as usize
    }
}

impl PartialEq for DataAsset {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for DataAsset {}

impl Hash for DataAsset {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl fmt::Debug for DataAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.record.try_read() {
            Some(r) => write!(f, "DataAsset({} @ {:#x})", r.type_name(), self.addr()),
            None => write!(f, "DataAsset(<locked> @ {:#x})", self.addr()),
        }
    }
}
