#[cfg(test)]
mod tests {
    // # Bulk Edit Tests
    //
    // Intersection rules, partial-failure apply and edit mode transitions
    // across mixed record types.

    use asset_db::*;
    use bulk_edit::*;
    use field_reflect::*;
    use std::any::Any;
    use std::sync::Arc;

    fn enemy(hp: i64) -> DynamicRecord {
        DynamicRecord::new(Arc::new(
            RecordSchema::builder("Enemy")
                .field("hp", "int", FieldValue::Integer(0))
                .field("speed", "float", FieldValue::Float(1.0))
                .field("tint", "Color", FieldValue::Color([1.0; 4]))
                .field("faction", "Faction", FieldValue::Enum(0))
                .private_field("ai_state", "int", FieldValue::Integer(0))
                .static_field("instances", "int", FieldValue::Integer(0))
                .build(),
        ))
        .with("hp", hp)
    }

    fn boss(hp: i64) -> DynamicRecord {
        DynamicRecord::new(Arc::new(
            RecordSchema::builder("Boss")
                .field("phase", "int", FieldValue::Integer(1))
                .field("hp", "int", FieldValue::Integer(0))
                .field("speed", "double", FieldValue::Float(1.0))
                .field("tint", "Color", FieldValue::Color([0.0; 4]))
                .static_field("instances", "int", FieldValue::Integer(0))
                .build(),
        ))
        .with("hp", hp)
    }

    /// Record whose `hp` field refuses writes
    #[derive(Clone)]
    struct Locked {
        hp: i64,
    }

    impl Reflect for Locked {
        fn type_name(&self) -> &str {
            "Locked"
        }

        fn fields(&self) -> Vec<FieldDescriptor> {
            vec![FieldDescriptor::new("hp", "int", FieldKind::Integer)]
        }

        fn get_field(&self, name: &str) -> Option<FieldValue> {
            (name == "hp").then_some(FieldValue::Integer(self.hp))
        }

        fn set_field(&mut self, name: &str, _value: FieldValue) -> Result<(), ReflectError> {
            Err(ReflectError::Rejected {
                field: name.to_string(),
                reason: "locked by version control".to_string(),
            })
        }

        fn clone_boxed(&self) -> Box<dyn Reflect> {
            Box::new(self.clone())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn test_mixed_types_intersect_by_name_and_type() {
        let selection = vec![DataAsset::new(enemy(1)), DataAsset::new(boss(2)), DataAsset::new(enemy(3))];
        // speed differs in declared type, private and static fields are out
        assert_eq!(compute_common_fields(&selection).names(), vec!["hp", "tint"]);
    }

    #[test]
    fn test_type_gate_across_three_objects() {
        let turret = DataAsset::new(DynamicRecord::new(Arc::new(
            RecordSchema::builder("Turret")
                .field("tint", "Color", FieldValue::Color([0.0; 4]))
                .field("hp", "float", FieldValue::Float(5.0))
                .build(),
        )));
        let selection = vec![DataAsset::new(enemy(1)), DataAsset::new(enemy(2)), turret];
        // hp is a float on the third object, so only tint survives
        assert_eq!(compute_common_fields(&selection).names(), vec!["tint"]);
    }

    #[test]
    fn test_disjoint_schemas_are_empty() {
        let other = DataAsset::new(DynamicRecord::new(Arc::new(
            RecordSchema::builder("Door")
                .field("open", "bool", FieldValue::Boolean(false))
                .build(),
        )));
        let selection = vec![DataAsset::new(enemy(1)), other, DataAsset::new(boss(3))];
        assert!(compute_common_fields(&selection).is_empty());
    }

    #[test]
    fn test_apply_saves_once_when_changed() {
        let store = MemoryAssetStore::new();
        let a = store.insert_record("Assets/A.asset", enemy(70));
        let b = store.insert_record("Assets/B.asset", enemy(1));
        let c = store.insert_record("Assets/C.asset", boss(1));
        let selection = vec![a.clone(), b.clone(), c.clone()];

        let outcome = apply_change("hp", &a, &selection, &store);
        assert_eq!(outcome, ApplyOutcome { any_changes: true, any_errors: false, skipped: 0 });
        assert_eq!(b.read().int_value("hp"), Ok(70));
        assert_eq!(c.read().int_value("hp"), Ok(70));
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_partial_failure_keeps_going() {
        let store = MemoryAssetStore::new();
        let source = store.insert_record("Assets/A.asset", enemy(5));
        let first = store.insert_record("Assets/B.asset", enemy(1));
        let locked = store.insert_record("Assets/L.asset", Locked { hp: 9 });
        let last = store.insert_record("Assets/C.asset", boss(2));
        let selection = vec![source.clone(), first.clone(), locked.clone(), last.clone()];

        let outcome = apply_change("hp", &source, &selection, &store);
        assert!(outcome.any_changes);
        assert!(outcome.any_errors);
        assert_eq!(first.read().int_value("hp"), Ok(5));
        assert_eq!(locked.read().int_value("hp"), Ok(9));
        assert_eq!(last.read().int_value("hp"), Ok(5));
        assert_eq!(store.save_count(), 1);
        assert!(store.was_saved(&first) && store.was_saved(&last));
        assert!(!store.was_saved(&locked));
    }

    #[test]
    fn test_all_failures_do_not_save() {
        let store = MemoryAssetStore::new();
        let source = store.insert_record("Assets/A.asset", enemy(5));
        let locked = store.insert_record("Assets/L.asset", Locked { hp: 9 });

        let outcome = apply_change("hp", &source, &[source.clone(), locked], &store);
        assert!(!outcome.any_changes);
        assert!(outcome.any_errors);
        assert_eq!(store.save_count(), 0);
        assert_eq!(store.dirty_count(), 0);
    }

    #[test]
    fn test_unsupported_kind_is_skipped_not_changed() {
        let store = MemoryAssetStore::new();
        let source = store.insert_record("Assets/A.asset", enemy(5).with("faction", FieldValue::Enum(2)));
        let target = store.insert_record("Assets/B.asset", enemy(1));

        let outcome = apply_change("faction", &source, &[source.clone(), target.clone()], &store);
        assert_eq!(outcome, ApplyOutcome { any_changes: false, any_errors: false, skipped: 1 });
        assert_eq!(target.read().get_field("faction"), Some(FieldValue::Enum(0)));
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_session_round_trip() {
        let store = MemoryAssetStore::new();
        let a = store.insert_record("Assets/A.asset", enemy(1));
        let b = store.insert_record("Assets/B.asset", boss(2));
        let selection = vec![a.clone(), b.clone()];

        let mut session = BulkEditSession::new();
        session.set_enabled(true, &selection);
        session.edit_field("hp", FieldValue::Integer(99), &selection).unwrap();
        session.edit_field("tint", FieldValue::Color([0.5; 4]), &selection).unwrap();
        assert_eq!(session.pending_fields(), vec!["hp", "tint"]);

        let outcome = session.apply_pending(&selection, &store);
        assert!(outcome.any_changes);
        assert!(session.pending_fields().is_empty());
        assert_eq!(a.read().int_value("hp"), Ok(99));
        assert_eq!(b.read().int_value("hp"), Ok(99));
        assert_eq!(b.read().color_value("tint"), Ok([0.5; 4]));
        assert_eq!(store.save_count(), 1);
        assert!(store.was_saved(&a));
        assert!(store.was_saved(&b));
    }

    #[test]
    fn test_edited_source_is_saved_when_targets_refuse() {
        let store = MemoryAssetStore::new();
        let a = store.insert_record("Assets/A.asset", enemy(1));
        let locked = store.insert_record("Assets/L.asset", Locked { hp: 9 });
        let selection = vec![a.clone(), locked.clone()];

        let mut session = BulkEditSession::new();
        session.set_enabled(true, &selection);
        session.edit_field("hp", FieldValue::Integer(42), &selection).unwrap();
        let outcome = session.apply_pending(&selection, &store);

        assert!(outcome.any_changes && outcome.any_errors);
        assert_eq!(a.read().int_value("hp"), Ok(42));
        assert!(store.was_saved(&a));
        assert!(!store.was_saved(&locked));
    }

    #[test]
    fn test_rejected_source_edit_is_reported() {
        let store = MemoryAssetStore::new();
        let locked = store.insert_record("Assets/L.asset", Locked { hp: 9 });
        let b = store.insert_record("Assets/B.asset", enemy(1));
        let selection = vec![locked.clone(), b.clone()];

        let mut session = BulkEditSession::new();
        session.set_enabled(true, &selection);
        session.edit_field("hp", FieldValue::Integer(42), &selection).unwrap();
        let outcome = session.apply_pending(&selection, &store);

        assert_eq!(outcome, ApplyOutcome { any_changes: false, any_errors: true, skipped: 0 });
        assert_eq!(b.read().int_value("hp"), Ok(1));
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_source_change_drops_edit() {
        let store = MemoryAssetStore::new();
        let a = store.insert_record("Assets/A.asset", enemy(1));
        let b = store.insert_record("Assets/B.asset", enemy(2));
        let c = store.insert_record("Assets/C.asset", enemy(3));
        let selection = vec![a.clone(), b.clone(), c.clone()];

        let mut session = BulkEditSession::new();
        session.set_enabled(true, &selection);
        session.edit_field("hp", FieldValue::Integer(99), &selection).unwrap();

        let remaining = vec![b.clone(), c.clone()];
        session.on_selection_changed(&remaining);
        let outcome = session.apply_pending(&remaining, &store);

        assert!(!outcome.any_changes);
        assert_eq!(c.read().int_value("hp"), Ok(3));
        assert_eq!(a.read().int_value("hp"), Ok(1));
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_deselect_all_clears_state() {
        let selection = vec![DataAsset::new(enemy(1)), DataAsset::new(enemy(2))];
        let mut session = BulkEditSession::new();
        session.set_enabled(true, &selection);
        session.edit_field("hp", FieldValue::Integer(3), &selection).unwrap();

        session.deselect_all();
        assert_eq!(session.mode(), EditMode::Inactive);
        assert!(session.common_fields().is_empty());
        assert!(session.pending_fields().is_empty());
        assert_eq!(selection[0].read().int_value("hp"), Ok(1));
    }

    #[test]
    fn test_toggle_off_and_back_on() {
        let selection = vec![DataAsset::new(enemy(1)), DataAsset::new(boss(2))];
        let mut session = BulkEditSession::new();
        session.set_enabled(true, &selection);
        session.set_enabled(false, &selection);
        assert!(session.common_fields().is_empty());
        session.set_enabled(true, &selection);
        assert_eq!(session.common_fields().len(), 2);
    }
}
