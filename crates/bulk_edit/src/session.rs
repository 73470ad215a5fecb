//! Bulk edit mode state machine

use asset_db::{AssetStore, DataAsset};
use field_reflect::{FieldValue, ReflectError};

use crate::apply::apply_edited_source;
use crate::{compute_common_fields, ApplyOutcome, CommonFieldSet};

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum BulkEditError {
    #[error("bulk edit is not active")]
    NotActive,

    #[error("'{0}' is not shared by every selected object")]
    NotCommon(String),

    #[error(transparent)]
    Reflect(#[from] ReflectError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditMode {
    #[default]
    Inactive,
    Active,
}

/// Editing state for one viewer. The first selected object is the source of
/// every bulk edit; the rest of the selection receives its values.
///
/// Edits stay in the session until [`BulkEditSession::apply_pending`] writes
/// them, so leaving bulk edit or changing the selection discards them.
#[derive(Debug, Default)]
pub struct BulkEditSession {
    mode: EditMode,
    common: CommonFieldSet,
    pending: Vec<(String, FieldValue)>,
}

impl BulkEditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.mode == EditMode::Active
    }

    pub fn common_fields(&self) -> &CommonFieldSet {
        &self.common
    }

    /// Fields edited and not yet applied, in edit order
    pub fn pending_fields(&self) -> Vec<&str> {
        self.pending.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// The value waiting to be applied to `name`, if it was edited
    pub fn pending_value(&self, name: &str) -> Option<&FieldValue> {
        self.pending.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Turn bulk editing on or off. It only turns on for two or more objects.
    pub fn set_enabled(&mut self, enabled: bool, selection: &[DataAsset]) -> EditMode {
        if !enabled {
            self.deactivate();
        } else if selection.len() >= 2 {
            self.mode = EditMode::Active;
            self.common = compute_common_fields(selection);
            self.pending.clear();
            tracing::debug!("Bulk edit enabled for {} objects", selection.len());
        } else {
            tracing::debug!("Bulk edit needs at least 2 selected objects");
        }
        self.mode
    }

    /// Recompute after a structural selection change; no-op while inactive.
    /// Unapplied edits are dropped.
    pub fn on_selection_changed(&mut self, selection: &[DataAsset]) {
        if !self.is_active() {
            return;
        }
        if selection.len() < 2 {
            self.deactivate();
            return;
        }
        self.common = compute_common_fields(selection);
        if !self.pending.is_empty() {
            tracing::debug!("Selection changed, discarding {} unapplied edit(s)", self.pending.len());
            self.pending.clear();
        }
    }

    pub fn deselect_all(&mut self) {
        self.deactivate();
    }

    /// Record a new value for a common field. Nothing is written until the next apply.
    pub fn edit_field(&mut self, name: &str, value: FieldValue, selection: &[DataAsset]) -> Result<(), BulkEditError> {
        if !self.is_active() || selection.len() < 2 {
            return Err(BulkEditError::NotActive);
        }
        let descriptor = self
            .common
            .get(name)
            .ok_or_else(|| BulkEditError::NotCommon(name.to_string()))?;
        if value.kind() != descriptor.kind {
            return Err(ReflectError::KindMismatch {
                field: name.to_string(),
                expected: descriptor.kind,
                found: value.kind(),
            }
            .into());
        }

        match self.pending.iter_mut().find(|(n, _)| n == name) {
            Some((_, pending)) => *pending = value,
            None => self.pending.push((name.to_string(), value)),
        }
        Ok(())
    }

    /// Write every pending edit to the source, then copy those fields to the
    /// rest of the selection. The source and changed targets are saved together.
    pub fn apply_pending(&mut self, selection: &[DataAsset], store: &dyn AssetStore) -> ApplyOutcome {
        if !self.is_active() || self.pending.is_empty() {
            return ApplyOutcome::default();
        }
        let Some(source) = selection.first() else {
            return ApplyOutcome::default();
        };

        let mut outcome = ApplyOutcome::default();
        let mut written = Vec::new();
        {
            let mut record = source.write();
            for (name, value) in self.pending.drain(..) {
                match record.set_field(&name, value) {
                    Ok(()) => written.push(name),
                    Err(e) => {
                        tracing::error!("Failed to edit '{}' on {}: {}", name, record.type_name(), e);
                        outcome.any_errors = true;
                    }
                }
            }
        }

        outcome.merge(apply_edited_source(&written, source, selection, store));
        outcome
    }

    fn deactivate(&mut self) {
        if self.is_active() {
            tracing::debug!("Bulk edit disabled");
        }
        self.mode = EditMode::Inactive;
        self.common = CommonFieldSet::empty();
        self.pending.clear();
    }
}
