use serde::{Deserialize, Serialize};

use crate::FieldKind;

/// Describes one field of a record schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name, unique within a schema
    pub name: String,
    /// Declared type as written in the schema (e.g. `float`, `List<int>`)
    pub declared_type: String,
    /// Kind of the field in the editable representation
    pub kind: FieldKind,
    /// Static (class-level) fields are not instance state
    pub is_static: bool,
    /// Whether the field is exposed through the editable representation
    pub serialized: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            kind,
            is_static: false,
            serialized: true,
        }
    }

    pub fn into_static(mut self) -> Self {
        self.is_static = true;
        self.serialized = false;
        self
    }

    pub fn non_serialized(mut self) -> Self {
        self.serialized = false;
        self
    }

    /// True when both descriptors declare the same type.
    pub fn same_declared_type(&self, other: &FieldDescriptor) -> bool {
        self.declared_type == other.declared_type
    }
}
