//! # Field Reflection
//!
//! Capability interface for records whose fields can be enumerated and edited by name.
//!
//! ## Features
//! - [`Reflect`]: list fields as `(name, declared type, kind)` and get/set values by name
//! - [`TypedFields`]: one typed accessor pair per copyable [`FieldKind`]
//! - [`SchemaDatabase`]: registry of record layouts, built at registration time
//! - [`DynamicRecord`]: a schema-driven record usable by any host
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use field_reflect::{DynamicRecord, FieldValue, RecordSchema, Reflect, TypedFields};
//!
//! let schema = Arc::new(
//!     RecordSchema::builder("Weapon")
//!         .field("damage", "int", FieldValue::Integer(10))
//!         .build(),
//! );
//! let mut sword = DynamicRecord::new(schema);
//! sword.set_int_value("damage", 25).unwrap();
//! assert_eq!(sword.int_value("damage"), Ok(25));
//! assert_eq!(sword.type_name(), "Weapon");
//! ```

mod descriptor;
mod record;
mod reflect;
mod schema;
mod value;

pub use descriptor::FieldDescriptor;
pub use record::DynamicRecord;
pub use reflect::{Reflect, ReflectError, TypedFields};
pub use schema::{RecordSchema, RecordSchemaBuilder, SchemaDatabase, SchemaField};
pub use value::{Bounds, Curve, FieldKind, FieldValue, Keyframe, ObjectRef, Rect};
