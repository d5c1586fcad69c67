use practa_storage::{
    MemoryBackend, PractaSlug, PractaStorage, StaticIdentity, StorageBackend, StorageManager,
    StorageNamespace, UserId, StorageLimits,
};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;

fn manager_for(backend: Arc<dyn StorageBackend>, user: UserId) -> StorageManager {
    StorageManager::new(backend, Arc::new(StaticIdentity::new(user)))
}

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,32}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Both identity kinds, including subjects shaped like device ids
fn user_id() -> impl Strategy<Value = UserId> {
    prop_oneof![
        "(anon-)?[a-z:%-]{1,8}".prop_map(UserId::authenticated),
        "[a-z:%-]{1,8}".prop_map(UserId::anonymous),
    ]
}

/// Builtin slugs and community slugs outside the reserved range
fn slug() -> impl Strategy<Value = PractaSlug> {
    prop_oneof![
        "[a-z-]{1,8}".prop_map(|t| PractaSlug::builtin(&t)),
        "[a-z:-]{1,12}"
            .prop_filter("reserved for builtins", |s| !PractaSlug::is_reserved(s))
            .prop_map(PractaSlug::community),
    ]
}

#[test]
fn authenticated_subject_never_reads_device_data() {
    let backend: Arc<dyn StorageBackend> = Arc::new(MemoryBackend::new());
    let device = manager_for(Arc::clone(&backend), UserId::anonymous("dev"));
    let signed_in = manager_for(Arc::clone(&backend), UserId::authenticated("anon-dev"));

    device
        .scoped(PractaSlug::builtin("journal"))
        .set("draft", "device data")
        .unwrap();

    let journal = signed_in.scoped(PractaSlug::builtin("journal"));
    assert_eq!(journal.get::<String>("draft"), None);
    journal.clear().unwrap();
    assert_eq!(
        device.scoped(PractaSlug::builtin("journal")).get::<String>("draft"),
        Some("device data".to_string())
    );
}

#[test]
fn remove_is_idempotent() {
    let manager = manager_for(Arc::new(MemoryBackend::new()), UserId::anonymous("d"));
    let storage = manager.scoped(PractaSlug::builtin("gratitude"));

    storage.set("entries", &json!(["tea", "sun"])).unwrap();
    storage.remove("entries").unwrap();
    storage.remove("entries").unwrap();

    assert_eq!(storage.get::<Value>("entries"), None);
    assert!(storage.keys().unwrap().is_empty());
}

#[test]
fn clear_only_touches_own_namespace() {
    let backend: Arc<dyn StorageBackend> = Arc::new(MemoryBackend::new());
    let manager = manager_for(Arc::clone(&backend), UserId::authenticated("alice"));
    let other_user = manager_for(Arc::clone(&backend), UserId::authenticated("bob"));

    let journal = manager.scoped(PractaSlug::builtin("journal"));
    let breathing = manager.scoped(PractaSlug::builtin("breathing"));
    let bobs_journal = other_user.scoped(PractaSlug::builtin("journal"));

    journal.set("a", &1).unwrap();
    journal.set("b", &2).unwrap();
    breathing.set("a", &3).unwrap();
    bobs_journal.set("a", &4).unwrap();

    journal.clear().unwrap();

    assert_eq!(journal.get::<i32>("a"), None);
    assert_eq!(journal.get::<i32>("b"), None);
    assert_eq!(breathing.get::<i32>("a"), Some(3));
    assert_eq!(bobs_journal.get::<i32>("a"), Some(4));
}

#[test]
fn corrupted_raw_value_reads_as_none() {
    let backend = Arc::new(MemoryBackend::new());
    let namespace = StorageNamespace::new(UserId::anonymous("d"), PractaSlug::community("box-breath"));
    backend
        .set_item(&namespace.key("state"), "{not json".to_string())
        .unwrap();

    let storage = PractaStorage::new(backend, namespace, StorageLimits::default());
    assert_eq!(storage.get::<Value>("state"), None);
}

proptest! {
    #[test]
    fn prop_round_trip(key in "[a-z][a-z0-9_:]{0,20}", value in json_value()) {
        let manager = manager_for(Arc::new(MemoryBackend::new()), UserId::anonymous("d"));
        let storage = manager.scoped(PractaSlug::community("round-trip"));

        storage.set(&key, &value).unwrap();
        prop_assert_eq!(storage.get::<Value>(&key), Some(value));
    }

    #[test]
    fn prop_namespace_isolation(
        user_a in user_id(),
        user_b in user_id(),
        slug_x in slug(),
        slug_y in slug(),
        key in "[a-z]{1,8}",
    ) {
        let backend: Arc<dyn StorageBackend> = Arc::new(MemoryBackend::new());
        let a = manager_for(Arc::clone(&backend), user_a.clone());
        let b = manager_for(Arc::clone(&backend), user_b.clone());

        a.scoped(slug_x.clone()).set(&key, "secret").unwrap();

        if user_a != user_b {
            prop_assert_eq!(b.scoped(slug_x.clone()).get::<String>(&key), None);
        }
        if slug_x != slug_y {
            prop_assert_eq!(a.scoped(slug_y).get::<String>(&key), None);
        }
    }

    #[test]
    fn prop_oversized_values_rejected(extra in 1usize..500) {
        let manager = manager_for(Arc::new(MemoryBackend::new()), UserId::anonymous("d"));
        let storage = manager.scoped(PractaSlug::builtin("journal"));

        let value = "z".repeat(StorageLimits::DEFAULT_MAX_VALUE_BYTES - 2 + extra);
        let err = storage.set("big", &value).unwrap_err();
        prop_assert!(err.is_quota());
        prop_assert_eq!(storage.get::<String>("big"), None);
    }
}
