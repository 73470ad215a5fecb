//! # Schema Database
//!
//! In-memory registry mapping record type names to their field layout.
//! Hosts register a [`RecordSchema`] once per data type and instantiate
//! [`DynamicRecord`]s from it, instead of relying on runtime reflection.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::{DynamicRecord, FieldDescriptor, FieldValue};

/// A field declaration together with its default value.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    pub descriptor: FieldDescriptor,
    pub default: FieldValue,
}

/// Field layout of one record type.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    /// Unique identifier, assigned on registration
    pub id: u64,
    /// Type name (case-insensitive for lookups)
    pub name: String,
    /// Optional category for grouping schemas
    pub category: Option<String>,
    /// Asset path of the script that defines the type
    pub script_path: Option<String>,
    /// Whether records of this type show the "open in viewer" affordance
    pub shows_viewer_button: bool,
    pub fields: Vec<SchemaField>,
}

impl RecordSchema {
    pub fn builder(name: impl Into<String>) -> RecordSchemaBuilder {
        RecordSchemaBuilder {
            schema: RecordSchema {
                id: 0,
                name: name.into(),
                category: None,
                script_path: None,
                shows_viewer_button: true,
                fields: Vec::new(),
            },
        }
    }

    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.descriptor.name == name)
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.descriptor.name == name)
    }
}

/// Builder for [`RecordSchema`]; the field kind is taken from the default value.
pub struct RecordSchemaBuilder {
    schema: RecordSchema,
}

impl RecordSchemaBuilder {
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.schema.category = Some(category.into());
        self
    }

    pub fn script_path(mut self, path: impl Into<String>) -> Self {
        self.schema.script_path = Some(path.into());
        self
    }

    pub fn hide_viewer_button(mut self) -> Self {
        self.schema.shows_viewer_button = false;
        self
    }

    /// Add a serialized instance field
    pub fn field(self, name: &str, declared_type: &str, default: FieldValue) -> Self {
        let descriptor = FieldDescriptor::new(name, declared_type, default.kind());
        self.push(descriptor, default)
    }

    /// Add an instance field that is not exposed for editing
    pub fn private_field(self, name: &str, declared_type: &str, default: FieldValue) -> Self {
        let descriptor = FieldDescriptor::new(name, declared_type, default.kind()).non_serialized();
        self.push(descriptor, default)
    }

    pub fn static_field(self, name: &str, declared_type: &str, default: FieldValue) -> Self {
        let descriptor = FieldDescriptor::new(name, declared_type, default.kind()).into_static();
        self.push(descriptor, default)
    }

    fn push(mut self, descriptor: FieldDescriptor, default: FieldValue) -> Self {
        if self.schema.field(&descriptor.name).is_some() {
            tracing::warn!(
                "Schema '{}' declares field '{}' twice; keeping the first declaration",
                self.schema.name,
                descriptor.name
            );
            return self;
        }
        self.schema.fields.push(SchemaField { descriptor, default });
        self
    }

    pub fn build(self) -> RecordSchema {
        self.schema
    }
}

/// Thread-safe registry of record schemas.
///
/// # Example
/// ```rust
/// use field_reflect::{FieldValue, RecordSchema, Reflect, SchemaDatabase};
///
/// let db = SchemaDatabase::new();
/// db.register(
///     RecordSchema::builder("EnemyStats")
///         .field("speed", "float", FieldValue::Float(1.0))
///         .build(),
/// );
/// let record = db.instantiate("enemystats").unwrap();
/// assert_eq!(record.get_field("speed"), Some(FieldValue::Float(1.0)));
/// ```
#[derive(Debug, Default)]
pub struct SchemaDatabase {
    schemas: DashMap<u64, Arc<RecordSchema>>,
    /// lowercase name -> schema ID
    name_index: DashMap<String, u64>,
    /// lowercase category -> schema IDs
    category_index: DashMap<String, Vec<u64>>,
    next_id: AtomicU64,
}

impl SchemaDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a schema and returns its assigned ID.
    ///
    /// Registering a second schema with the same name replaces the first.
    pub fn register(&self, schema: RecordSchema) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let key = schema.name.to_lowercase();

        if let Some(previous) = self.name_index.get(&key).map(|e| *e.value()) {
            tracing::debug!("Replacing schema '{}' (id {})", schema.name, previous);
            self.unregister(previous);
        }

        let schema = Arc::new(RecordSchema { id, ..schema });

        if let Some(cat) = &schema.category {
            self.category_index
                .entry(cat.to_lowercase())
                .or_default()
                .push(id);
        }
        self.name_index.insert(key, id);
        self.schemas.insert(id, schema);
        id
    }

    pub fn unregister(&self, id: u64) -> Option<Arc<RecordSchema>> {
        let (_, schema) = self.schemas.remove(&id)?;
        self.name_index.remove(&schema.name.to_lowercase());
        if let Some(cat) = &schema.category {
            if let Some(mut ids) = self.category_index.get_mut(&cat.to_lowercase()) {
                ids.retain(|&i| i != id);
            }
        }
        Some(schema)
    }

    pub fn get(&self, id: u64) -> Option<Arc<RecordSchema>> {
        self.schemas.get(&id).map(|e| e.value().clone())
    }

    /// Case-insensitive lookup by type name
    pub fn get_by_name(&self, name: &str) -> Option<Arc<RecordSchema>> {
        let id = *self.name_index.get(&name.to_lowercase())?;
        self.get(id)
    }

    pub fn get_by_category(&self, category: &str) -> Vec<Arc<RecordSchema>> {
        self.category_index
            .get(&category.to_lowercase())
            .map(|ids| ids.iter().filter_map(|id| self.get(*id)).collect())
            .unwrap_or_default()
    }

    /// Substring search over type names, case-insensitive
    pub fn search(&self, query: &str) -> Vec<Arc<RecordSchema>> {
        let query = query.to_lowercase();
        let mut found: Vec<_> = self
            .schemas
            .iter()
            .filter(|e| e.value().name.to_lowercase().contains(&query))
            .map(|e| e.value().clone())
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        found
    }

    /// Create a record initialised with the schema defaults
    pub fn instantiate(&self, name: &str) -> Option<DynamicRecord> {
        self.get_by_name(name).map(DynamicRecord::new)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn clear(&self) {
        self.schemas.clear();
        self.name_index.clear();
        self.category_index.clear();
    }
}
