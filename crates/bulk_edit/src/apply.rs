//! Copying field values from a source object onto targets

use asset_db::{AssetStore, DataAsset};
use field_reflect::{FieldKind, Reflect, ReflectError, TypedFields};

/// Result of a bulk apply. Changes and errors are tracked independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub any_changes: bool,
    pub any_errors: bool,
    /// (field, target) pairs left untouched: unsupported kind or field missing on the target
    pub skipped: usize,
}

impl ApplyOutcome {
    pub(crate) fn merge(&mut self, other: ApplyOutcome) {
        self.any_changes |= other.any_changes;
        self.any_errors |= other.any_errors;
        self.skipped += other.skipped;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    Unsupported(FieldKind),
}

/// Copy one field from `source` to `target` through its typed accessor.
///
/// Kinds outside [`FieldKind::COPYABLE`] are reported as unsupported and left alone.
pub fn copy_field_value(field: &str, source: &dyn Reflect, target: &mut dyn Reflect) -> Result<CopyOutcome, ReflectError> {
    let descriptor = source.field(field).ok_or_else(|| ReflectError::UnknownField {
        type_name: source.type_name().to_string(),
        field: field.to_string(),
    })?;

    match descriptor.kind {
        FieldKind::Integer => target.set_int_value(field, source.int_value(field)?)?,
        FieldKind::Boolean => target.set_bool_value(field, source.bool_value(field)?)?,
        FieldKind::Float => target.set_float_value(field, source.float_value(field)?)?,
        FieldKind::String => target.set_string_value(field, source.string_value(field)?)?,
        FieldKind::Color => target.set_color_value(field, source.color_value(field)?)?,
        FieldKind::ObjectReference => {
            target.set_object_reference_value(field, source.object_reference_value(field)?)?
        }
        FieldKind::BitMask => target.set_bit_mask_value(field, source.bit_mask_value(field)?)?,
        FieldKind::Vector2 => target.set_vector2_value(field, source.vector2_value(field)?)?,
        FieldKind::Vector3 => target.set_vector3_value(field, source.vector3_value(field)?)?,
        FieldKind::Vector4 => target.set_vector4_value(field, source.vector4_value(field)?)?,
        FieldKind::Rect => target.set_rect_value(field, source.rect_value(field)?)?,
        FieldKind::ArraySize => target.set_array_size(field, source.array_size(field)?)?,
        FieldKind::Character => target.set_char_value(field, source.char_value(field)?)?,
        FieldKind::Curve => target.set_curve_value(field, source.curve_value(field)?)?,
        FieldKind::Bounds => target.set_bounds_value(field, source.bounds_value(field)?)?,
        FieldKind::Quaternion => target.set_quaternion_value(field, source.quaternion_value(field)?)?,
        other => return Ok(CopyOutcome::Unsupported(other)),
    }
    Ok(CopyOutcome::Copied)
}

/// Copy `field` from `source` to every target, then persist if anything changed
pub fn apply_change(field: &str, source: &DataAsset, targets: &[DataAsset], store: &dyn AssetStore) -> ApplyOutcome {
    apply_changes(&[field], source, targets, store)
}

/// Copy several fields at once; targets are saved in a single pass
pub fn apply_changes<S: AsRef<str>>(
    fields: &[S],
    source: &DataAsset,
    targets: &[DataAsset],
    store: &dyn AssetStore,
) -> ApplyOutcome {
    copy_and_persist(fields, source, targets, store, false)
}

/// Like [`apply_changes`] for a source that was just edited: the source is
/// saved along with the targets even when no target took the value.
pub(crate) fn apply_edited_source<S: AsRef<str>>(
    fields: &[S],
    source: &DataAsset,
    targets: &[DataAsset],
    store: &dyn AssetStore,
) -> ApplyOutcome {
    copy_and_persist(fields, source, targets, store, !fields.is_empty())
}

fn copy_and_persist<S: AsRef<str>>(
    fields: &[S],
    source: &DataAsset,
    targets: &[DataAsset],
    store: &dyn AssetStore,
    source_edited: bool,
) -> ApplyOutcome {
    let mut outcome = ApplyOutcome::default();
    let mut changed: Vec<&DataAsset> = Vec::new();
    if source_edited {
        outcome.any_changes = true;
        changed.push(source);
    }

    for field in fields {
        let field = field.as_ref();
        let (field_outcome, touched) = copy_to_targets(field, source, targets);
        outcome.merge(field_outcome);
        for target in touched {
            if !changed.iter().any(|c| c.ptr_eq(target)) {
                changed.push(target);
            }
        }
    }

    if outcome.any_changes {
        for asset in &changed {
            store.mark_dirty(asset);
        }
        store.save_assets();
        tracing::info!("Applied {} field(s) to {} object(s)", fields.len(), changed.len());
    }
    outcome
}

fn copy_to_targets<'a>(field: &str, source: &DataAsset, targets: &'a [DataAsset]) -> (ApplyOutcome, Vec<&'a DataAsset>) {
    let mut outcome = ApplyOutcome::default();
    let mut touched = Vec::new();

    let kind = source.read().field(field).map(|d| d.kind);
    let kind = match kind {
        Some(kind) => kind,
        None => {
            tracing::error!("Source object has no field '{}'", field);
            outcome.any_errors = true;
            return (outcome, touched);
        }
    };
    if !kind.is_copyable() {
        tracing::warn!("Unsupported property type {} for field '{}', skipping", kind, field);
        outcome.skipped = targets.iter().filter(|t| !t.ptr_eq(source)).count();
        return (outcome, touched);
    }

    for target in targets.iter().filter(|t| !t.ptr_eq(source)) {
        if target.read().field(field).is_none() {
            tracing::debug!("Target {} has no field '{}', skipping", target.type_name(), field);
            outcome.skipped += 1;
            continue;
        }

        let result = {
            let src = source.read();
            let mut dst = target.write();
            copy_field_value(field, &**src, &mut **dst)
        };
        match result {
            Ok(CopyOutcome::Copied) => {
                outcome.any_changes = true;
                touched.push(target);
            }
            Ok(CopyOutcome::Unsupported(kind)) => {
                tracing::warn!("Unsupported property type {} for field '{}', skipping", kind, field);
                outcome.skipped += 1;
            }
            Err(e) => {
                tracing::error!("Failed to apply '{}' to {}: {}", field, target.type_name(), e);
                outcome.any_errors = true;
            }
        }
    }
    (outcome, touched)
}
