#[cfg(test)]
mod tests {
    // # Inventory Viewer Tests
    //
    // End-to-end behaviour of the viewer over an in-memory project: browsing,
    // selection, category management, asset operations with deferred follow-ups,
    // preferences and bulk editing.

    use asset_db::*;
    use asset_inventory::*;
    use asset_refs::{ReferenceCache, ReferenceIndex};
    use bulk_edit::EditMode;
    use field_reflect::{DynamicRecord, FieldValue, RecordSchema, TypedFields};
    use std::sync::Arc;

    struct Fixture {
        store: Arc<MemoryAssetStore>,
        cache: Arc<ReferenceCache>,
        viewer: Viewer,
    }

    impl Fixture {
        fn asset(&self, path: &str) -> DataAsset {
            self.store.load(&path.into()).unwrap()
        }
    }

    fn enemy_schema() -> Arc<RecordSchema> {
        Arc::new(
            RecordSchema::builder("Enemy")
                .field("hp", "int", FieldValue::Integer(100))
                .field("tag", "string", FieldValue::String("grunt".to_string()))
                .build(),
        )
    }

    fn weapon_schema() -> Arc<RecordSchema> {
        Arc::new(
            RecordSchema::builder("Weapon")
                .field("damage", "int", FieldValue::Integer(1))
                .build(),
        )
    }

    fn project() -> Arc<MemoryAssetStore> {
        let store = Arc::new(MemoryAssetStore::new());
        store.insert_record("Assets/Data/Goblin.asset", DynamicRecord::new(enemy_schema()).with("hp", 30i64));
        store.insert_record("Assets/Data/Orc.asset", DynamicRecord::new(enemy_schema()).with("hp", 80i64));
        store.insert_record("Assets/Data/Sword.asset", DynamicRecord::new(weapon_schema()));
        store.insert_record("Assets/Editor/Debug.asset", DynamicRecord::new(weapon_schema()));
        store.insert_file("Assets/Scenes/Main.unity", &["Assets/Data/Goblin.asset"]);
        store
    }

    fn open_with(store: Arc<MemoryAssetStore>, prefs: Arc<dyn PreferenceStore>, config: InventoryConfig) -> Fixture {
        let cache = ReferenceCache::new(ReferenceIndex::new(store.clone()));
        cache.start();
        let mut viewer = Viewer::new(store.clone(), cache.clone(), prefs, config);
        viewer.open().unwrap();
        Fixture { store, cache, viewer }
    }

    fn open() -> Fixture {
        open_with(project(), Arc::new(MemoryPreferences::new()), InventoryConfig::default())
    }

    #[test]
    fn test_open_lists_categories_and_skips_excluded_paths() {
        let f = open();
        assert_eq!(f.viewer.catalog().categories(), ["Enemy".to_string(), "Weapon".to_string()]);
        // Debug.asset lives under /Editor/, the manager is never listed
        assert_eq!(f.viewer.catalog().len(), 3);
        assert!(f.store.contains(&"Assets/ScriptableObjectCategoryManager.asset".into()));
    }

    #[test]
    fn test_displayed_objects_follow_toggles_and_search() {
        let mut f = open();
        assert!(f.viewer.displayed_objects("").is_empty());

        assert!(f.viewer.toggle_category("Enemy"));
        assert_eq!(f.viewer.displayed_objects("").len(), 2);
        assert_eq!(f.viewer.displayed_objects("GOB"), vec![f.asset("Assets/Data/Goblin.asset")]);

        f.viewer.set_categories_toggled(&["Enemy", "Weapon"], true);
        assert_eq!(f.viewer.displayed_objects("").len(), 3);
        assert_eq!(f.viewer.visible_categories("wea"), vec!["Weapon"]);
    }

    #[test]
    fn test_toggle_off_deselects_category_objects() {
        let mut f = open();
        f.viewer.set_categories_toggled(&["Enemy", "Weapon"], true);
        f.viewer.select_all_displayed("");
        assert_eq!(f.viewer.selected().len(), 3);

        assert!(!f.viewer.toggle_category("Enemy"));
        assert_eq!(f.viewer.selected(), &[f.asset("Assets/Data/Sword.asset")]);
    }

    #[test]
    fn test_deselect_all_leaves_bulk_edit() {
        let mut f = open();
        f.viewer.toggle_category("Enemy");
        f.viewer.select_all_displayed("");
        assert_eq!(f.viewer.set_bulk_edit(true), EditMode::Active);

        f.viewer.deselect_all_displayed("");
        assert!(f.viewer.selected().is_empty());
        assert_eq!(f.viewer.bulk().mode(), EditMode::Inactive);
    }

    #[test]
    fn test_bulk_edit_through_viewer() {
        let mut f = open();
        let goblin = f.asset("Assets/Data/Goblin.asset");
        let orc = f.asset("Assets/Data/Orc.asset");
        f.viewer.select(&goblin);
        f.viewer.select(&orc);
        f.viewer.set_bulk_edit(true);
        assert_eq!(f.viewer.bulk().common_fields().names(), vec!["hp", "tag"]);

        f.viewer.edit_common_field("hp", FieldValue::Integer(7)).unwrap();
        assert_eq!(goblin.read().int_value("hp"), Ok(30));
        let outcome = f.viewer.apply_common_changes();
        assert!(outcome.any_changes && !outcome.any_errors);
        assert_eq!(goblin.read().int_value("hp"), Ok(7));
        assert_eq!(orc.read().int_value("hp"), Ok(7));
        assert!(f.store.was_saved(&goblin) && f.store.was_saved(&orc));

        // Dropping to one object leaves bulk edit
        f.viewer.deselect(&orc);
        assert_eq!(f.viewer.bulk().mode(), EditMode::Inactive);
        assert!(f.viewer.edit_common_field("hp", FieldValue::Integer(1)).is_err());
    }

    #[test]
    fn test_assign_and_remove_user_category() {
        let mut f = open();
        let goblin = f.asset("Assets/Data/Goblin.asset");
        f.viewer.select(&goblin);

        assert!(f.viewer.assign_selected_to_category("").is_err());
        f.viewer.assign_selected_to_category("Bosses").unwrap();
        assert!(f.viewer.catalog().is_user_defined("Bosses"));
        assert_eq!(f.viewer.catalog().category_of(&goblin), Some("Bosses"));
        assert_eq!(f.viewer.catalog().objects_in("Enemy").len(), 1);

        assert!(f.viewer.remove_category("Enemy").is_err());
        f.viewer.remove_category("Bosses").unwrap();
        assert!(!f.viewer.catalog().contains_category("Bosses"));
        assert_eq!(f.viewer.catalog().category_of(&goblin), Some("Enemy"));
    }

    #[test]
    fn test_exclude_and_include_are_persisted() {
        let mut f = open();
        f.viewer.toggle_category("Weapon");
        f.viewer.exclude_category("Weapon").unwrap();

        assert_eq!(f.viewer.excluded_categories(), ["Weapon".to_string()]);
        assert!(!f.viewer.is_category_toggled("Weapon"));
        assert_eq!(f.viewer.visible_categories(""), vec!["Enemy"]);

        let manager = CategoryManagerHandle::load_or_create(
            f.store.as_ref(),
            &"Assets/ScriptableObjectCategoryManager.asset".into(),
        )
        .unwrap();
        assert_eq!(
            manager.read(|m| m.excluded_categories.clone()).unwrap(),
            vec!["Weapon".to_string()]
        );

        f.viewer.include_category("Weapon").unwrap();
        assert!(f.viewer.excluded_categories().is_empty());
        assert_eq!(f.viewer.visible_categories("").len(), 2);
    }

    #[test]
    fn test_favorites_sort_first() {
        let mut f = open();
        assert!(f.viewer.toggle_favorite("Weapon").unwrap());
        assert_eq!(f.viewer.catalog().categories(), ["Weapon".to_string(), "Enemy".to_string()]);
        assert!(!f.viewer.toggle_favorite("Weapon").unwrap());
        assert_eq!(f.viewer.catalog().categories(), ["Enemy".to_string(), "Weapon".to_string()]);
    }

    #[test]
    fn test_rename_restores_selection_on_next_tick() {
        let mut f = open();
        let goblin = f.asset("Assets/Data/Goblin.asset");
        let orc = f.asset("Assets/Data/Orc.asset");
        f.viewer.toggle_category("Enemy");
        f.viewer.select(&goblin);
        f.viewer.select(&orc);

        assert!(f.viewer.rename(&goblin, "").is_err());
        assert!(f.viewer.rename(&goblin, "Goblin").is_err());

        let new_path = f.viewer.rename(&goblin, "Hobgoblin").unwrap();
        assert_eq!(new_path.as_str(), "Assets/Data/Hobgoblin.asset");
        // catalog reload from the cache refresh, then the follow-up
        assert_eq!(f.viewer.pending_tasks(), 2);

        f.viewer.tick();
        assert_eq!(f.viewer.selected(), &[orc, goblin.clone()]);
        assert_eq!(f.viewer.catalog().entry_for(&goblin).unwrap().name(), "Hobgoblin");
        assert!(f.store.refresh_count() >= 1);
    }

    #[test]
    fn test_rename_collision_gets_unique_name() {
        let mut f = open();
        let goblin = f.asset("Assets/Data/Goblin.asset");
        let new_path = f.viewer.rename(&goblin, "Orc").unwrap();
        assert_eq!(new_path.as_str(), "Assets/Data/Orc 1.asset");
    }

    #[test]
    fn test_copy_adds_copy_to_selection() {
        let mut f = open();
        let goblin = f.asset("Assets/Data/Goblin.asset");
        f.viewer.select(&goblin);

        let first = f.viewer.copy(&goblin).unwrap();
        let second = f.viewer.copy(&goblin).unwrap();
        assert_eq!(first.as_str(), "Assets/Data/Goblin_Copy.asset");
        assert_eq!(second.as_str(), "Assets/Data/Goblin_Copy 1.asset");

        f.viewer.tick();
        let selected = f.viewer.selected();
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0], goblin);
        assert_eq!(f.store.path_of(&selected[1]), Some(second));
        assert_eq!(f.viewer.catalog().objects_in("Enemy").len(), 4);
    }

    #[test]
    fn test_delete_drops_object_from_selection() {
        let mut f = open();
        let goblin = f.asset("Assets/Data/Goblin.asset");
        let orc = f.asset("Assets/Data/Orc.asset");
        f.viewer.select(&goblin);
        f.viewer.select(&orc);

        f.viewer.delete(&orc).unwrap();
        f.viewer.tick();
        assert_eq!(f.viewer.selected(), &[goblin]);
        assert_eq!(f.viewer.catalog().objects_in("Enemy").len(), 1);

        assert!(f.viewer.delete(&orc).is_err());
    }

    #[test]
    fn test_reset_restores_defaults_and_keeps_name() {
        let mut f = open();
        let goblin = f.asset("Assets/Data/Goblin.asset");
        let saves = f.store.save_count();

        f.viewer.reset(&goblin).unwrap();
        assert_eq!(goblin.read().int_value("hp"), Ok(100));
        assert_eq!(f.store.path_of(&goblin), Some("Assets/Data/Goblin.asset".into()));
        assert_eq!(f.store.save_count(), saves + 1);
    }

    #[test]
    fn test_cache_refresh_reloads_catalog_on_tick() {
        let mut f = open();
        f.store.insert_record("Assets/Data/Troll.asset", DynamicRecord::new(enemy_schema()));
        f.store.notify_project_changed();

        assert_eq!(f.viewer.catalog().objects_in("Enemy").len(), 2);
        assert_eq!(f.viewer.tick(), 1);
        assert_eq!(f.viewer.catalog().objects_in("Enemy").len(), 3);
    }

    #[test]
    fn test_close_stops_reloads() {
        let mut f = open();
        f.viewer.close().unwrap();
        f.store.notify_project_changed();
        assert_eq!(f.viewer.pending_tasks(), 0);
        assert_eq!(f.cache.cache_refreshed().subscriber_count(), 0);
    }

    #[test]
    fn test_manager_dropped_from_index_built_before_open() {
        let store = project();
        let manager_path = AssetId::new("Assets/ScriptableObjectCategoryManager.asset");
        CategoryManagerHandle::load_or_create(store.as_ref(), &manager_path).unwrap();
        store.add_dependency(&manager_path, "Assets/Data/Goblin.asset");

        let cache = ReferenceCache::new(ReferenceIndex::new(store.clone()));
        cache.start();
        assert_eq!(cache.referencing_assets(&"Assets/Data/Goblin.asset".into()).len(), 2);

        let mut viewer = Viewer::new(store.clone(), cache.clone(), Arc::new(MemoryPreferences::new()), InventoryConfig::default());
        viewer.open().unwrap();
        let goblin = store.load(&"Assets/Data/Goblin.asset".into()).unwrap();
        assert_eq!(viewer.find_references(&goblin), vec![AssetId::new("Assets/Scenes/Main.unity")]);
    }

    #[test]
    fn test_find_references() {
        let f = open();
        let goblin = f.asset("Assets/Data/Goblin.asset");
        assert_eq!(f.viewer.find_references(&goblin), vec![AssetId::new("Assets/Scenes/Main.unity")]);
        assert!(f.viewer.find_references(&f.asset("Assets/Data/Orc.asset")).is_empty());
    }

    #[test]
    fn test_viewer_button_capability() {
        let f = open();
        let manager = f.asset("Assets/ScriptableObjectCategoryManager.asset");
        assert!(!Viewer::shows_viewer_button(&manager));
        assert!(Viewer::shows_viewer_button(&f.asset("Assets/Data/Goblin.asset")));
    }

    #[test]
    fn test_large_selection_is_truncated() {
        let config = InventoryConfig {
            large_selection_threshold: 1,
            ..InventoryConfig::default()
        };
        let mut f = open_with(project(), Arc::new(MemoryPreferences::new()), config);
        f.viewer.toggle_category("Enemy");
        f.viewer.select_all_displayed("");
        assert!(f.viewer.is_selection_truncated());
        assert_eq!(f.viewer.visible_selection().len(), 1);
    }

    #[test]
    fn test_state_survives_reopen_with_file_preferences() {
        let dir = tempfile::tempdir().unwrap();
        let prefs_path = dir.path().join("prefs.json");
        let store = project();

        {
            let prefs: Arc<dyn PreferenceStore> = Arc::new(FilePreferences::open(&prefs_path).unwrap());
            let mut f = open_with(store.clone(), prefs, InventoryConfig::default());
            let orc = f.asset("Assets/Data/Orc.asset");
            f.viewer.toggle_category("Enemy");
            f.viewer.select(&orc);
            f.viewer.close().unwrap();
        }

        let prefs: Arc<dyn PreferenceStore> = Arc::new(FilePreferences::open(&prefs_path).unwrap());
        let f = open_with(store, prefs, InventoryConfig::default());
        assert_eq!(f.viewer.selected(), &[f.asset("Assets/Data/Orc.asset")]);
        assert!(f.viewer.is_category_toggled("Enemy"));
    }

    #[test]
    fn test_unresolvable_saved_guids_are_dropped() {
        let store = project();
        let guid = store.guid_of(&"Assets/Data/Sword.asset".into()).unwrap();
        let prefs = Arc::new(MemoryPreferences::new());
        prefs
            .set_string(
                "SOV_SelectedObjects",
                &format!(r#"{{"selectedGuids":["deadbeef","{}"]}}"#, guid.as_str()),
            )
            .unwrap();

        let f = open_with(store, prefs, InventoryConfig::default());
        assert_eq!(f.viewer.selected(), &[f.asset("Assets/Data/Sword.asset")]);
    }

    #[test]
    fn test_corrupt_preferences_do_not_block_open() {
        let prefs = Arc::new(MemoryPreferences::new());
        prefs.set_string("SOV_CategoryToggleStates", "[oops").unwrap();
        let f = open_with(project(), prefs, InventoryConfig::default());
        assert!(f.viewer.is_open());
    }

    #[test]
    fn test_include_packages_lists_package_assets() {
        let store = project();
        store.insert_record("Assets/Data/Rail.asset", DynamicRecord::new(weapon_schema()));
        store.set_script(&"Assets/Data/Rail.asset".into(), "Packages/com.vendor.rails/Weapon.cs");

        let mut f = open_with(store, Arc::new(MemoryPreferences::new()), InventoryConfig::default());
        assert_eq!(f.viewer.catalog().objects_in("Weapon").len(), 1);
        f.viewer.set_include_packages(true).unwrap();
        assert_eq!(f.viewer.catalog().objects_in("Weapon").len(), 2);
    }

    #[test]
    fn test_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.toml");
        std::fs::write(&path, "catalog_progress_interval = 10\nproject_root_prefix = \"Game/\"\n").unwrap();

        let config = InventoryConfig::load(&path).unwrap();
        assert_eq!(config.catalog_progress_interval, 10);
        assert_eq!(config.project_root_prefix, "Game/");
        assert_eq!(config.large_selection_threshold, 500);
        assert!(InventoryConfig::load(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_logging_init_is_idempotent() {
        logging::init(false);
        logging::init(true);
    }
}
