//! End-to-end resolution over a populated registry.

use super::test_utils::{at, scene_with_cube, system, system_with};
use std::sync::Arc;
use warden::context::StaticCapabilities;
use warden::setting::{catalog, AltSet, Datum, PolyValue, Target};
use warden::{ActorId, ApiError};

#[test]
fn test_unassigned_key_resolves_to_default() {
    let mut system = system();
    scene_with_cube(&mut system, "spawn", 4, 0.0, 10.0);

    for key in system.keys().iter().map(|k| k.id().to_string()).collect::<Vec<_>>() {
        let evaluation = system.resolve(&key, None, &at(5.0, 5.0, 5.0)).unwrap();
        assert!(evaluation.is_default(), "{} should fall back to default", key);
        assert_eq!(
            evaluation.value,
            system.keys().get(&key).unwrap().default_datum()
        );
    }
}

#[test]
fn test_higher_priority_wins() {
    let mut system = system();
    scene_with_cube(&mut system, "a", 5, 0.0, 10.0);
    scene_with_cube(&mut system, "b", 10, 0.0, 10.0);
    system.set_value("a", "pvp", catalog::PVP.value(true)).unwrap();
    system.set_value("b", "pvp", catalog::PVP.value(false)).unwrap();

    let evaluation = system.resolve("pvp", None, &at(5.0, 5.0, 5.0)).unwrap();
    assert_eq!(evaluation.value, Datum::Bool(false));
    assert_eq!(evaluation.trace.len(), 1);
    assert_eq!(evaluation.trace[0].host, "b");
}

#[test]
fn test_blacklisted_actor_falls_through() {
    let mut system = system();
    scene_with_cube(&mut system, "a", 5, 0.0, 10.0);
    scene_with_cube(&mut system, "b", 10, 0.0, 10.0);
    system
        .set_value("a", "greeting", catalog::GREETING.value(Some("X".to_string())))
        .unwrap();
    system
        .set_value("b", "greeting", catalog::GREETING.value(Some("Y".to_string())))
        .unwrap();
    system
        .set_target("b", "greeting", Target::blacklist([ActorId::new("actor1")]))
        .unwrap();

    let point = at(5.0, 5.0, 5.0);
    let actor1 = ActorId::new("actor1");
    let actor2 = ActorId::new("actor2");
    assert_eq!(
        system
            .evaluate_as(catalog::GREETING, Some(&actor1), &point)
            .unwrap(),
        Some("X".to_string())
    );
    assert_eq!(
        system
            .evaluate_as(catalog::GREETING, Some(&actor2), &point)
            .unwrap(),
        Some("Y".to_string())
    );
}

#[test]
fn test_target_only_assignment_carries_down() {
    let mut system = system();
    scene_with_cube(&mut system, "base", 1, 0.0, 10.0);
    scene_with_cube(&mut system, "overlay", 8, 0.0, 10.0);
    system.set_value("base", "pvp", catalog::PVP.value(false)).unwrap();
    system
        .set_target("overlay", "pvp", Target::whitelist([ActorId::new("member")]))
        .unwrap();

    let point = at(1.0, 1.0, 1.0);
    let member = ActorId::new("member");
    let visitor = ActorId::new("visitor");
    assert!(!system.evaluate_as(catalog::PVP, Some(&member), &point).unwrap());
    assert!(system.evaluate_as(catalog::PVP, Some(&visitor), &point).unwrap());
}

#[test]
fn test_poly_layers_compose() {
    let mut system = system();
    scene_with_cube(&mut system, "lower", 2, 0.0, 10.0);
    scene_with_cube(&mut system, "upper", 6, 0.0, 10.0);
    system
        .set_value("lower", "letters", PolyValue::subtractive(AltSet::of(["b"])).into())
        .unwrap();
    system
        .set_value("upper", "letters", PolyValue::additive(AltSet::of(["d"])).into())
        .unwrap();

    let evaluation = system.resolve("letters", None, &at(3.0, 3.0, 3.0)).unwrap();
    assert_eq!(evaluation.value, Datum::Set(AltSet::of(["a", "c", "d"])));
    let hosts: Vec<&str> = evaluation.trace.iter().map(|t| t.host.as_str()).collect();
    assert_eq!(hosts, vec!["lower", "upper"]);
    assert_eq!(evaluation.trace[0].value, Datum::Set(AltSet::of(["a", "c"])));
    assert!(evaluation.redundant_hosts().is_empty());
}

#[test]
fn test_unrestricted_actor_bypasses_restrictive_target() {
    let caps = StaticCapabilities::new().grant("op", warden::context::DEFAULT_UNRESTRICTED_CAPABILITY);
    let mut system = system_with(Arc::new(caps));
    scene_with_cube(&mut system, "vault", 3, 0.0, 10.0);
    system.set_value("vault", "entry", catalog::ENTRY.value(false)).unwrap();
    system.set_target("vault", "entry", Target::none()).unwrap();

    let point = at(5.0, 5.0, 5.0);
    assert!(!system
        .evaluate_as(catalog::ENTRY, Some(&ActorId::new("op")), &point)
        .unwrap());
    assert!(system
        .evaluate_as(catalog::ENTRY, Some(&ActorId::new("guest")), &point)
        .unwrap());

    system
        .edit_target("vault", "entry", |target| *target = Target::none().forced())
        .unwrap();
    assert!(system
        .evaluate_as(catalog::ENTRY, Some(&ActorId::new("op")), &point)
        .unwrap());
}

#[test]
fn test_destroyed_scene_no_longer_applies() {
    let mut system = system();
    scene_with_cube(&mut system, "arena", 5, 0.0, 10.0);
    system.set_value("arena", "pvp", catalog::PVP.value(false)).unwrap();
    let point = at(5.0, 5.0, 5.0);
    assert!(!system.evaluate_as(catalog::PVP, None, &point).unwrap());

    system.destroy_scene("arena").unwrap();
    let evaluation = system.resolve("pvp", None, &point).unwrap();
    assert!(evaluation.is_default());
    let hosts = system.find_containing_hosts(&point).unwrap();
    assert_eq!(hosts.len(), 1);
    assert!(hosts[0].is_global());
}

#[test]
fn test_equal_priority_ties_break_by_name() {
    let mut system = system();
    scene_with_cube(&mut system, "beta", 4, 0.0, 10.0);
    scene_with_cube(&mut system, "Alpha", 4, 0.0, 10.0);
    system.set_value("beta", "pvp", catalog::PVP.value(true)).unwrap();
    system.set_value("Alpha", "pvp", catalog::PVP.value(false)).unwrap();

    let evaluation = system.resolve("pvp", None, &at(5.0, 5.0, 5.0)).unwrap();
    assert_eq!(evaluation.trace[0].host, "Alpha");
}

#[test]
fn test_global_assignment_applies_everywhere() {
    let mut system = system();
    system
        .set_value("_global", "fire-spread", catalog::FIRE_SPREAD.value(false))
        .unwrap();
    let point = warden::Point::new("nether", -500.0, 12.0, 9000.0);
    assert!(!system.evaluate_as(catalog::FIRE_SPREAD, None, &point).unwrap());
}

#[test]
fn test_unknown_inputs_not_found() {
    let system = system();
    assert!(matches!(
        system.resolve("pvp", None, &warden::Point::new("end", 0.0, 0.0, 0.0)),
        Err(ApiError::DomainNotFound(_))
    ));
    assert!(matches!(
        system.resolve("flight", None, &at(0.0, 0.0, 0.0)),
        Err(ApiError::SettingKeyNotFound(_))
    ));
}
