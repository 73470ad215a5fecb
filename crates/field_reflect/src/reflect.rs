//! The reflection capability implemented by editable records.

use std::any::Any;

use crate::{Bounds, Curve, FieldDescriptor, FieldKind, FieldValue, ObjectRef, Rect};

/// Errors raised when reading or writing a reflected field
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReflectError {
    #[error("type '{type_name}' has no field '{field}'")]
    UnknownField { type_name: String, field: String },

    #[error("field '{field}' expects {expected}, got {found}")]
    KindMismatch {
        field: String,
        expected: FieldKind,
        found: FieldKind,
    },

    #[error("field '{0}' is read-only")]
    ReadOnly(String),

    #[error("field '{field}' rejected the value: {reason}")]
    Rejected { field: String, reason: String },

    #[error("type '{0}' cannot be reset to defaults")]
    ResetUnsupported(String),
}

/// Capability interface for records whose fields can be listed, read and written by name.
///
/// Implementors describe every field (instance and static) through [`Reflect::fields`].
/// Consumers that only care about instance state use [`Reflect::instance_fields`].
pub trait Reflect: Any + Send + Sync {
    /// Runtime schema name of this record
    fn type_name(&self) -> &str;

    /// All declared fields in schema order
    fn fields(&self) -> Vec<FieldDescriptor>;

    fn get_field(&self, name: &str) -> Option<FieldValue>;

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), ReflectError>;

    /// Deep copy used when duplicating assets
    fn clone_boxed(&self) -> Box<dyn Reflect>;

    /// Look up a single field descriptor by name
    fn field(&self, name: &str) -> Option<FieldDescriptor> {
        self.fields().into_iter().find(|f| f.name == name)
    }

    /// Public and private instance fields, static fields excluded
    fn instance_fields(&self) -> Vec<FieldDescriptor> {
        self.fields().into_iter().filter(|f| !f.is_static).collect()
    }

    /// Restore every field to the schema default
    fn reset_to_defaults(&mut self) -> Result<(), ReflectError> {
        Err(ReflectError::ResetUnsupported(self.type_name().to_string()))
    }

    /// Whether editors should offer the "open in viewer" affordance for this record
    fn shows_viewer_button(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

macro_rules! typed_accessors {
    ($($get:ident, $set:ident, $variant:ident, $ty:ty;)*) => {
        /// Typed get/set accessors over [`Reflect`], one pair per copyable kind.
        pub trait TypedFields: Reflect {
            $(
                fn $get(&self, name: &str) -> Result<$ty, ReflectError> {
                    match self.get_field(name) {
                        Some(FieldValue::$variant(v)) => Ok(v),
                        Some(other) => Err(ReflectError::KindMismatch {
                            field: name.to_string(),
                            expected: FieldKind::$variant,
                            found: other.kind(),
                        }),
                        None => Err(ReflectError::UnknownField {
                            type_name: self.type_name().to_string(),
                            field: name.to_string(),
                        }),
                    }
                }

                fn $set(&mut self, name: &str, value: $ty) -> Result<(), ReflectError> {
                    self.set_field(name, FieldValue::$variant(value))
                }
            )*
        }
    };
}

typed_accessors! {
    int_value, set_int_value, Integer, i64;
    bool_value, set_bool_value, Boolean, bool;
    float_value, set_float_value, Float, f64;
    string_value, set_string_value, String, String;
    color_value, set_color_value, Color, [f32; 4];
    object_reference_value, set_object_reference_value, ObjectReference, Option<ObjectRef>;
    bit_mask_value, set_bit_mask_value, BitMask, u32;
    vector2_value, set_vector2_value, Vector2, [f32; 2];
    vector3_value, set_vector3_value, Vector3, [f32; 3];
    vector4_value, set_vector4_value, Vector4, [f32; 4];
    rect_value, set_rect_value, Rect, Rect;
    array_size, set_array_size, ArraySize, usize;
    char_value, set_char_value, Character, char;
    curve_value, set_curve_value, Curve, Curve;
    bounds_value, set_bounds_value, Bounds, Bounds;
    quaternion_value, set_quaternion_value, Quaternion, [f32; 4];
}

impl<T: Reflect + ?Sized> TypedFields for T {}
