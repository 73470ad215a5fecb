#[cfg(test)]
mod tests {
    // # SchemaDatabase Tests
    //
    // Registration, lookup, removal and instantiation of record schemas,
    // plus a rough performance check on large registries.

    use field_reflect::*;
    use std::time::Instant;

    fn weapon() -> RecordSchema {
        RecordSchema::builder("Weapon")
            .category("Combat")
            .script_path("Assets/Scripts/Weapon.cs")
            .field("damage", "int", FieldValue::Integer(10))
            .field("tint", "Color", FieldValue::Color([1.0, 1.0, 1.0, 1.0]))
            .private_field("cache", "Dictionary<int,int>", FieldValue::Opaque(FieldKind::Generic, String::new()))
            .build()
    }

    #[test]
    fn test_register_and_get() {
        let db = SchemaDatabase::new();
        let id = db.register(weapon());

        let schema = db.get(id).unwrap();
        assert_eq!(schema.name, "Weapon");
        assert_eq!(schema.category.as_deref(), Some("Combat"));
        assert_eq!(schema.fields.len(), 3);
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let db = SchemaDatabase::new();
        db.register(weapon());
        assert!(db.get_by_name("weapon").is_some());
        assert_eq!(db.get_by_category("COMBAT").len(), 1);
    }

    #[test]
    fn test_search() {
        let db = SchemaDatabase::new();
        db.register(RecordSchema::builder("EnemyStats").build());
        db.register(RecordSchema::builder("EnemyWave").build());
        db.register(RecordSchema::builder("LootTable").build());

        let results = db.search("enemy");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "EnemyStats");
    }

    #[test]
    fn test_unregister() {
        let db = SchemaDatabase::new();
        let id = db.register(weapon());
        assert!(db.unregister(id).is_some());
        assert!(db.get(id).is_none());
        assert!(db.get_by_name("Weapon").is_none());
        assert!(db.get_by_category("Combat").is_empty());
        assert!(db.unregister(id).is_none());
    }

    #[test]
    fn test_clear_and_is_empty() {
        let db = SchemaDatabase::new();
        db.register(weapon());
        assert!(!db.is_empty());
        db.clear();
        assert!(db.is_empty());
        assert_eq!(db.len(), 0);
    }

    #[test]
    fn test_instantiate_uses_defaults() {
        let db = SchemaDatabase::new();
        db.register(weapon());
        let record = db.instantiate("Weapon").unwrap();
        assert_eq!(record.int_value("damage"), Ok(10));
        assert_eq!(record.color_value("tint"), Ok([1.0, 1.0, 1.0, 1.0]));
        assert!(db.instantiate("Shield").is_none());
    }

    #[test]
    fn test_private_fields_are_instance_but_not_serialized() {
        let db = SchemaDatabase::new();
        db.register(weapon());
        let record = db.instantiate("Weapon").unwrap();
        let cache = record.field("cache").unwrap();
        assert!(!cache.is_static);
        assert!(!cache.serialized);
        assert_eq!(record.instance_fields().len(), 3);
    }

    #[test]
    fn test_hidden_viewer_button_flag() {
        let db = SchemaDatabase::new();
        db.register(RecordSchema::builder("Manager").hide_viewer_button().build());
        let record = db.instantiate("Manager").unwrap();
        assert!(!record.shows_viewer_button());
        assert!(db.instantiate("Manager").unwrap().as_any().is::<DynamicRecord>());
    }

    #[test]
    fn test_large_register_performance() {
        let db = SchemaDatabase::new();
        let count = 10_000;
        let start = Instant::now();
        for i in 0..count {
            db.register(
                RecordSchema::builder(format!("Type{}", i))
                    .category("Perf")
                    .field("v", "int", FieldValue::Integer(i))
                    .build(),
            );
        }
        let duration = start.elapsed();
        assert_eq!(db.len(), count as usize);
        assert_eq!(db.get_by_category("perf").len(), count as usize);
        assert!(duration.as_secs_f32() < 2.0, "Registration took too long: {:?}", duration);
    }
}
