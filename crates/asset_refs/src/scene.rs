use asset_db::{AssetId, AssetStore, DataAsset};
use field_reflect::FieldKind;

/// Number of scene objects holding at least one object-reference field that
/// points at `target`. Each object counts once however many fields match.
pub fn count_scene_references(store: &dyn AssetStore, target: &AssetId, scene_objects: &[DataAsset]) -> usize {
    scene_objects
        .iter()
        .filter(|object| {
            let record = object.read();
            record
                .instance_fields()
                .iter()
                .filter(|f| f.serialized && f.kind == FieldKind::ObjectReference)
                .filter_map(|f| record.get_field(&f.name))
                .filter_map(|v| v.object_ref().cloned())
                .any(|r| store.resolve_reference(&r).as_ref() == Some(target))
        })
        .count()
}
