use spawnpool::*;

#[test]
fn test_limit_treats_non_positive_as_unbounded() {
    assert_eq!(PoolSettings::with_max_pool_size(0).limit(), None);
    assert_eq!(PoolSettings::with_max_pool_size(-3).limit(), None);
    assert_eq!(PoolSettings::with_max_pool_size(8).limit(), Some(8));
    assert_eq!(PoolSettings::default().limit(), None);
}

#[test]
fn test_settings_from_json() {
    let settings: PoolSettings = serde_json::from_str(r#"{ "max_pool_size": 32 }"#).unwrap();
    assert_eq!(settings.limit(), Some(32));

    let settings: PoolSettings = serde_json::from_str("{}").unwrap();
    assert_eq!(settings, PoolSettings::default());
}

#[test]
fn test_settings_to_json() {
    let json = serde_json::to_string(&PoolSettings::with_max_pool_size(-1)).unwrap();
    assert_eq!(json, r#"{"max_pool_size":-1}"#);
}

#[test]
fn test_hooks_debug_shows_which_are_set() {
    let hooks = PoolHooks::new().on_spawned(|| {});
    assert_eq!(
        format!("{hooks:?}"),
        "PoolHooks { on_created: false, on_spawned: true, on_despawned: false }"
    );
}
