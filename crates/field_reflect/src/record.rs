use std::any::Any;
use std::sync::Arc;

use crate::{FieldDescriptor, FieldValue, RecordSchema, Reflect, ReflectError};

/// A record whose layout comes from a registered [`RecordSchema`].
///
/// Values are stored in schema order, so field lookups are a linear scan over
/// the (small) schema.
#[derive(Debug, Clone)]
pub struct DynamicRecord {
    schema: Arc<RecordSchema>,
    values: Vec<FieldValue>,
}

impl DynamicRecord {
    pub fn new(schema: Arc<RecordSchema>) -> Self {
        let values = schema.fields.iter().map(|f| f.default.clone()).collect();
        Self { schema, values }
    }

    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    /// Builder-style setter used when seeding fixtures
    pub fn with(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        if let Err(e) = self.set_field(name, value.into()) {
            tracing::warn!("Ignoring seed value for '{}': {}", name, e);
        }
        self
    }
}

impl Reflect for DynamicRecord {
    fn type_name(&self) -> &str {
        &self.schema.name
    }

    fn fields(&self) -> Vec<FieldDescriptor> {
        self.schema.fields.iter().map(|f| f.descriptor.clone()).collect()
    }

    fn get_field(&self, name: &str) -> Option<FieldValue> {
        let index = self.schema.field_index(name)?;
        self.values.get(index).cloned()
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), ReflectError> {
        let index = self
            .schema
            .field_index(name)
            .ok_or_else(|| ReflectError::UnknownField {
                type_name: self.schema.name.clone(),
                field: name.to_string(),
            })?;

        let descriptor = &self.schema.fields[index].descriptor;
        if descriptor.is_static {
            return Err(ReflectError::ReadOnly(name.to_string()));
        }
        if descriptor.kind != value.kind() {
            return Err(ReflectError::KindMismatch {
                field: name.to_string(),
                expected: descriptor.kind,
                found: value.kind(),
            });
        }

        self.values[index] = value;
        Ok(())
    }

    fn clone_boxed(&self) -> Box<dyn Reflect> {
        Box::new(self.clone())
    }

    fn reset_to_defaults(&mut self) -> Result<(), ReflectError> {
        for (value, field) in self.values.iter_mut().zip(&self.schema.fields) {
            if !field.descriptor.is_static {
                *value = field.default.clone();
            }
        }
        Ok(())
    }

    fn shows_viewer_button(&self) -> bool {
        self.schema.shows_viewer_button
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
