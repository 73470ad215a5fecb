//! Schema intersection over a selection

use asset_db::DataAsset;
use field_reflect::FieldDescriptor;

/// Fields shared by every selected object, by name and declared type,
/// in the first object's schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonFieldSet {
    fields: Vec<FieldDescriptor>,
}

impl CommonFieldSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Intersect the instance schemas of `selection`.
///
/// Empty for fewer than two objects. Static fields never take part and only
/// serialized fields are kept, since nothing else can be edited in bulk.
pub fn compute_common_fields(selection: &[DataAsset]) -> CommonFieldSet {
    let Some((first, rest)) = selection.split_first() else {
        return CommonFieldSet::empty();
    };
    if rest.is_empty() {
        return CommonFieldSet::empty();
    }

    let mut candidates = first.read().instance_fields();

    // Name intersection
    for other in rest {
        let other_fields = other.read().instance_fields();
        candidates.retain(|c| other_fields.iter().any(|f| f.name == c.name));
        if candidates.is_empty() {
            tracing::warn!("No common fields across {} selected objects", selection.len());
            return CommonFieldSet::empty();
        }
    }

    // Declared type must match everywhere
    candidates.retain(|candidate| {
        rest.iter().all(|other| {
            other
                .read()
                .field(&candidate.name)
                .is_some_and(|f| !f.is_static && f.same_declared_type(candidate))
        })
    });
    candidates.retain(|c| c.serialized);

    if candidates.is_empty() {
        tracing::warn!("No common fields across {} selected objects", selection.len());
    } else {
        tracing::debug!("{} common field(s) across {} objects", candidates.len(), selection.len());
    }
    CommonFieldSet { fields: candidates }
}
