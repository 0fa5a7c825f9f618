//! Registry state through both storage backends.

use super::test_utils::{at, scene_with_cube, system};
use tempfile::TempDir;
use warden::setting::{catalog, AltSet, Datum, PolyValue, Target};
use warden::store::{
    AssignmentRecord, HostStorage, JsonFileHostStore, SceneRecord, SledHostStore, SystemSnapshot,
};
use warden::{ActorId, ApiError, Host, HostSystem};

fn populated() -> HostSystem {
    let mut system = system();
    scene_with_cube(&mut system, "spawn", 4, 0.0, 10.0);
    scene_with_cube(&mut system, "Market", 2, -20.0, 20.0);
    system.set_value("spawn", "pvp", catalog::PVP.value(false)).unwrap();
    system
        .set_target("spawn", "pvp", Target::blacklist([ActorId::new("griefer")]))
        .unwrap();
    system
        .set_value("Market", "letters", PolyValue::additive(AltSet::of(["z"])).into())
        .unwrap();
    system
        .set_value("_global", "greeting", catalog::GREETING.value(Some("hi".to_string())))
        .unwrap();
    system
}

fn assert_same_behaviour(original: &HostSystem, restored: &HostSystem) {
    let point = at(5.0, 5.0, 5.0);
    for key in ["pvp", "letters", "greeting"] {
        for actor in [None, Some(ActorId::new("griefer"))] {
            assert_eq!(
                original.resolve(key, actor.as_ref(), &point).unwrap(),
                restored.resolve(key, actor.as_ref(), &point).unwrap(),
            );
        }
    }
}

fn round_trip(store: &dyn HostStorage) {
    let original = populated();
    store.save(&original.snapshot()).unwrap();

    let mut restored = system();
    restored.restore(store.load().unwrap()).unwrap();
    assert_eq!(restored.snapshot(), original.snapshot());
    assert_same_behaviour(&original, &restored);
}

#[test]
fn test_sled_store_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let store = SledHostStore::new(temp_dir.path().join("store")).unwrap();
    round_trip(&store);
}

#[test]
fn test_json_store_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let store = JsonFileHostStore::new(temp_dir.path().join("state.json"));
    round_trip(&store);

    let raw = std::fs::read_to_string(store.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["scenes"][0]["name"], "Market");
}

#[test]
fn test_restore_with_unknown_key_keeps_state() {
    let mut system = populated();
    let before = system.snapshot();

    let mut snapshot = before.clone();
    snapshot.scenes.push(SceneRecord {
        name: "broken".to_string(),
        priority: 1,
        volumes: Vec::new(),
        settings: vec![AssignmentRecord {
            key: "no-such-key".to_string(),
            value: Some(Datum::Bool(true).into()),
            target: None,
        }],
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    });

    let err = system.restore(snapshot).unwrap_err();
    assert!(matches!(err, ApiError::SettingKeyNotFound(_)));
    assert_eq!(system.snapshot(), before);
    assert!(system.scene("broken").is_err());
}

#[test]
fn test_restore_expires_previous_handles() {
    let mut system = populated();
    let handle = system.scene("spawn").unwrap().handle();
    let snapshot = system.snapshot();

    system.restore(snapshot).unwrap();
    assert!(matches!(system.edit_scene(handle), Err(ApiError::Expired(_))));
    let fresh = system.scene("spawn").unwrap().handle();
    assert_ne!(fresh, handle);
    assert_eq!(system.scene("spawn").unwrap().priority(), 4);
}

#[test]
fn test_empty_snapshot_clears_registry() {
    let mut system = populated();
    system.restore(SystemSnapshot::default()).unwrap();
    assert!(system.scenes().is_empty());
    assert!(system.global().settings().is_empty());
    assert_eq!(system.domains().count(), 0);
}
