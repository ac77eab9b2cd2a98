use std::collections::BTreeMap;

use feature_flag_evaluation::{
    registry_from_store, save_registry, Context, DefaultValue, FeatureFlags, FlagRecord,
    FlagStore, JsonFileStore, SerializedFlag,
};
use tempfile::tempdir;

#[test]
fn boolean_flags_round_trip_through_the_store() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("flags.json"));

    let mut registry = FeatureFlags::default();
    registry.set(
        "beta",
        FlagRecord::new(true)
            .with_condition("userRole", "admin")
            .with_rollout_percentage(50.0),
    );
    registry.set("plain", FlagRecord::new(false));
    save_registry(&store, &registry).unwrap();

    let loaded = registry_from_store(&store).unwrap();
    assert_eq!(loaded.get("beta"), registry.get("beta"));
    assert_eq!(loaded.get("plain"), registry.get("plain"));
    assert_eq!(loaded.list().len(), 2);
}

#[test]
fn predicate_defaults_are_dropped_at_the_boundary() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("flags.json"));

    let mut registry = FeatureFlags::default();
    registry.set(
        "dynamic",
        FlagRecord::new(DefaultValue::predicate(|_: &Context| true)),
    );
    save_registry(&store, &registry).unwrap();

    // The store keeps the flag but not the predicate.
    assert_eq!(
        store.get_item("dynamic").unwrap().unwrap().default_value,
        None
    );
    let loaded = registry_from_store(&store).unwrap();
    assert_eq!(
        loaded.get("dynamic").unwrap().default,
        DefaultValue::Bool(false)
    );
}

#[test]
fn loaded_registry_evaluates_like_the_saved_one() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("flags.json"));

    let mut registry = FeatureFlags::default();
    registry.set("ramp", FlagRecord::new(false).with_rollout_percentage(30.0));
    save_registry(&store, &registry).unwrap();
    let loaded = registry_from_store(&store).unwrap();

    for i in 0..50 {
        let local = Context::new().with_user_id(format!("user-{i}"));
        assert_eq!(
            loaded.is_enabled("ramp", Some(&local)).unwrap(),
            registry.is_enabled("ramp", Some(&local)).unwrap()
        );
    }
}

#[test]
fn seeding_never_overwrites_stored_flags() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("flags.json"));

    let mut stored = BTreeMap::new();
    stored.insert(
        "beta".to_string(),
        SerializedFlag {
            default_value: Some(true),
            ..Default::default()
        },
    );
    store.save(&stored).unwrap();

    let mut seed = BTreeMap::new();
    seed.insert(
        "beta".to_string(),
        SerializedFlag {
            default_value: Some(false),
            ..Default::default()
        },
    );
    seed.insert("fresh".to_string(), SerializedFlag::default());
    store.seed(&seed).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded["beta"].default_value, Some(true));
    assert_eq!(loaded["fresh"].default_value, None);
}
