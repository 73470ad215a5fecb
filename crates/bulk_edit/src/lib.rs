//! # Bulk Edit
//!
//! Finds the fields shared by a heterogeneous selection of data assets and
//! copies values from one selected object to all the others.
//!
//! ## Features
//! - [`compute_common_fields`]: two-pass schema intersection (name, then declared type)
//! - [`apply_change`]: allowlisted, per-kind value copy with partial-failure tolerance
//! - [`BulkEditSession`]: the `Inactive | Active` edit mode and its pending edits
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use asset_db::MemoryAssetStore;
//! use bulk_edit::{apply_change, compute_common_fields};
//! use field_reflect::{DynamicRecord, FieldValue, RecordSchema, TypedFields};
//!
//! let schema = Arc::new(RecordSchema::builder("Enemy").field("hp", "int", FieldValue::Integer(10)).build());
//! let store = MemoryAssetStore::new();
//! let a = store.insert_record("Assets/A.asset", DynamicRecord::new(schema.clone()).with("hp", 50i64));
//! let b = store.insert_record("Assets/B.asset", DynamicRecord::new(schema));
//! let selection = vec![a.clone(), b.clone()];
//!
//! assert_eq!(compute_common_fields(&selection).names(), vec!["hp"]);
//! let outcome = apply_change("hp", &a, &selection, &store);
//! assert!(outcome.any_changes);
//! assert_eq!(b.read().int_value("hp"), Ok(50));
//! ```

mod apply;
mod common;
mod session;

pub use apply::{apply_change, apply_changes, copy_field_value, ApplyOutcome, CopyOutcome};
pub use common::{compute_common_fields, CommonFieldSet};
pub use session::{BulkEditError, BulkEditSession, EditMode};
