//! Scene, volume and assignment lifecycle through the public registry API.

use super::test_utils::{at, cube, scene_with_cube, system};
use warden::error::ErrorKind;
use warden::geometry::{Shape, ZoneType};
use warden::setting::{catalog, Target, TargetKind};
use warden::{ActorId, ApiError, Host, PriorityShift, VolumeId};

#[test]
fn test_unset_without_value_changes_nothing() {
    let mut system = system();
    scene_with_cube(&mut system, "spawn", 1, 0.0, 10.0);
    let before = system.snapshot();

    assert_eq!(system.unset_value("spawn", "pvp").unwrap(), None);
    assert_eq!(system.unset_value("_global", "pvp").unwrap(), None);
    assert_eq!(system.snapshot(), before);
}

#[test]
fn test_unset_returns_previous_value() {
    let mut system = system();
    scene_with_cube(&mut system, "spawn", 1, 0.0, 10.0);
    system.set_value("spawn", "pvp", catalog::PVP.value(false)).unwrap();
    assert_eq!(
        system.unset_value("spawn", "pvp").unwrap(),
        Some(catalog::PVP.value(false))
    );
    assert!(system.scene("spawn").unwrap().settings().is_empty());
}

#[test]
fn test_rejected_operations_leave_no_partial_state() {
    let mut system = system();
    scene_with_cube(&mut system, "spawn", 1, 0.0, 10.0);
    let before = system.snapshot();

    let errors = vec![
        system.create_scene("Spawn", 2).unwrap_err(),
        system.create_scene("_admin", 2).unwrap_err(),
        system.create_scene("market", -4).unwrap_err(),
        system.create_scene("two words", 0).unwrap_err(),
        system.rename_scene("spawn", "_global").unwrap_err(),
        system.set_priority("spawn", -1).unwrap_err(),
    ];
    for err in &errors {
        assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{}", err);
    }
    assert!(Shape::cuboid(0.0, 0.0, 0.0, 0.0, 5.0, 5.0).is_err());
    assert!(Shape::sphere(0.0, 0.0, 0.0, -1.0).is_err());
    assert!(Shape::slab(0.0, 0.0).is_err());
    assert_eq!(system.snapshot(), before);
}

#[test]
fn test_rename_keeps_volumes_and_assignments() {
    let mut system = system();
    scene_with_cube(&mut system, "spawn", 3, 0.0, 10.0);
    system.set_value("spawn", "pvp", catalog::PVP.value(false)).unwrap();
    let old = system.scene("spawn").unwrap().handle();

    let new = system.rename_scene("SPAWN", "Lobby").unwrap();
    assert_ne!(old, new);
    assert!(matches!(system.edit_scene(old), Err(ApiError::Expired(_))));

    let evaluation = system.resolve("pvp", None, &at(5.0, 5.0, 5.0)).unwrap();
    assert_eq!(evaluation.trace[0].host, "Lobby");
    assert!(matches!(
        system.scene("spawn"),
        Err(ApiError::SceneNotFound(_))
    ));
}

#[test]
fn test_rename_case_only_is_allowed() {
    let mut system = system();
    scene_with_cube(&mut system, "spawn", 3, 0.0, 10.0);
    system.rename_scene("spawn", "Spawn").unwrap();
    assert_eq!(system.scene("spawn").unwrap().name(), "Spawn");
}

#[test]
fn test_destroy_expires_editor_and_volumes() {
    let mut system = system();
    scene_with_cube(&mut system, "arena", 2, 0.0, 10.0);
    let handle = system.scene("arena").unwrap().handle();
    let volume = system.scene("arena").unwrap().volumes()[0];

    let scene = system.destroy_scene("arena").unwrap();
    assert_eq!(scene.name(), "arena");
    assert!(matches!(system.volume(volume), Err(ApiError::VolumeNotFound(_))));
    assert!(!system.domain("overworld").unwrap().holds(volume));

    let err = system.edit_scene(handle).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::ConsistencyViolation);

    // A new scene with the same name is a different object.
    scene_with_cube(&mut system, "arena", 2, 0.0, 10.0);
    assert!(matches!(system.edit_scene(handle), Err(ApiError::Expired(_))));
}

#[test]
fn test_editor_follows_its_own_rename() {
    let mut system = system();
    let handle = system.create_scene("camp", 0).unwrap();
    let mut editor = system.edit_scene(handle).unwrap();
    let id = editor.add_volume("overworld", cube(0.0, 4.0)).unwrap();
    editor
        .add_volume("overworld", Shape::cylinder(0.0, 0.0, 0.0, 3.0, 8.0).unwrap())
        .unwrap();
    editor.rename("base-camp").unwrap();
    editor.set_value("heal-amount", catalog::HEAL_AMOUNT.value(4)).unwrap();
    assert_eq!(
        editor.zone_types().unwrap(),
        vec![ZoneType::Cuboid, ZoneType::Cylinder]
    );
    editor.remove_volume(id).unwrap();
    let new_handle = editor.handle();

    assert!(matches!(system.edit_scene(handle), Err(ApiError::Expired(_))));
    let scene = system.scene_by_handle(new_handle).unwrap();
    assert_eq!(scene.name(), "base-camp");
    assert_eq!(scene.volumes().len(), 1);
    assert_eq!(
        system
            .evaluate_as(catalog::HEAL_AMOUNT, None, &at(0.0, 1.0, 0.0))
            .unwrap(),
        4
    );
}

#[test]
fn test_priority_shift_cascades_through_overlaps() {
    let mut system = system();
    scene_with_cube(&mut system, "mover", 1, 0.0, 10.0);
    scene_with_cube(&mut system, "first", 5, 5.0, 15.0);
    scene_with_cube(&mut system, "second", 6, 12.0, 20.0);
    scene_with_cube(&mut system, "far", 5, 100.0, 110.0);

    let shift = system.set_priority("mover", 5).unwrap();
    assert_eq!(
        shift,
        PriorityShift {
            success_count: 3,
            fail_count: 0
        }
    );
    assert_eq!(system.scene("mover").unwrap().priority(), 5);
    assert_eq!(system.scene("first").unwrap().priority(), 6);
    assert_eq!(system.scene("second").unwrap().priority(), 7);
    assert_eq!(system.scene("far").unwrap().priority(), 5);
}

#[test]
fn test_update_volume_moves_between_domains() {
    let mut system = system();
    scene_with_cube(&mut system, "portal", 1, 0.0, 10.0);
    let id = system.scene("portal").unwrap().volumes()[0];

    system
        .update_volume(id, "nether", Shape::sphere(0.0, 0.0, 0.0, 4.0).unwrap())
        .unwrap();
    let names: Vec<String> = system
        .find_containing_hosts(&at(1.0, 1.0, 1.0))
        .unwrap()
        .iter()
        .map(|h| h.name().to_string())
        .collect();
    assert_eq!(names, vec!["_global"]);
    let nether = warden::Point::new("NETHER", 1.0, 1.0, 1.0);
    assert_eq!(system.find_containing_hosts(&nether).unwrap().len(), 2);
}

#[test]
fn test_remove_unknown_volume() {
    let mut system = system();
    assert!(matches!(
        system.remove_volume(VolumeId(99)),
        Err(ApiError::VolumeNotFound(VolumeId(99)))
    ));
}

#[test]
fn test_target_editing() {
    let mut system = system();
    scene_with_cube(&mut system, "shop", 1, 0.0, 10.0);
    system.set_value("shop", "item-pickup", catalog::ITEM_PICKUP.value(false)).unwrap();
    system.set_target("shop", "item-pickup", Target::all()).unwrap();

    let added = system
        .edit_target("shop", "item-pickup", |t| t.add_actor(ActorId::new("thief")))
        .unwrap();
    assert!(added);
    let target = system
        .scene("shop")
        .unwrap()
        .settings()
        .target("item-pickup")
        .cloned()
        .unwrap();
    assert!(matches!(target.kind, TargetKind::Whitelist(_)));

    let point = at(1.0, 1.0, 1.0);
    assert!(!system
        .evaluate_as(catalog::ITEM_PICKUP, Some(&ActorId::new("thief")), &point)
        .unwrap());
    assert!(system
        .evaluate_as(catalog::ITEM_PICKUP, Some(&ActorId::new("buyer")), &point)
        .unwrap());

    assert_eq!(system.remove_target("shop", "item-pickup").unwrap(), Some(target));
    assert!(!system
        .evaluate_as(catalog::ITEM_PICKUP, Some(&ActorId::new("buyer")), &point)
        .unwrap());
    assert_eq!(system.remove_target("shop", "item-pickup").unwrap(), None);
}
