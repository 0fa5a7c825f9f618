//! Property-based tests for priority resolution

use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;
use warden::context::{EngineContext, NoCapabilities};
use warden::geometry::Shape;
use warden::setting::{catalog, AltSet, Datum, PolyValue, SettingKey, SettingKeyRegistry, StringSetCodec, Target};
use warden::{ActorId, HostSystem, Point};

const LETTERS: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

fn registry() -> HostSystem {
    let mut builder = SettingKeyRegistry::builder();
    catalog::register_standard(&mut builder).unwrap();
    builder
        .register(
            SettingKey::poly("letters", AltSet::of(["a", "b", "c"]), StringSetCodec::new())
                .build()
                .unwrap(),
        )
        .unwrap();
    let mut system = HostSystem::new(builder.build(), EngineContext::new(Arc::new(NoCapabilities)));
    system.register_domain("overworld").unwrap();
    system
}

fn add_scene(system: &mut HostSystem, name: &str, priority: i32) {
    system.create_scene(name, priority).unwrap();
    system
        .add_volume(
            name,
            "overworld",
            Shape::cuboid(0.0, 0.0, 0.0, 10.0, 10.0, 10.0).unwrap(),
        )
        .unwrap();
}

fn center() -> Point {
    Point::new("overworld", 5.0, 5.0, 5.0)
}

/// Distinct priorities in random order, one per layer.
fn shuffled_priorities(n: usize) -> impl Strategy<Value = Vec<i32>> {
    Just((0..n as i32).map(|p| p * 3).collect::<Vec<_>>()).prop_shuffle()
}

fn letter_set() -> impl Strategy<Value = BTreeSet<&'static str>> {
    prop::collection::btree_set(prop::sample::select(LETTERS.to_vec()), 0..4)
}

proptest! {
    #[test]
    fn test_unassigned_keys_resolve_to_default(
        x in -1.0e6..1.0e6f64, y in -1.0e6..1.0e6f64, z in -1.0e6..1.0e6f64,
        with_scene in any::<bool>(),
    ) {
        let mut system = registry();
        if with_scene {
            add_scene(&mut system, "around", 1);
        }
        let point = Point::new("overworld", x, y, z);
        let keys: Vec<String> = system.keys().iter().map(|k| k.id().to_string()).collect();
        for key in keys {
            let evaluation = system.resolve(&key, None, &point).unwrap();
            prop_assert!(evaluation.is_default());
            prop_assert_eq!(evaluation.value, system.keys().get(&key).unwrap().default_datum());
        }
    }

    #[test]
    fn test_first_eligible_by_priority_wins(
        layers in (1usize..8).prop_flat_map(|n| (
            shuffled_priorities(n),
            prop::collection::vec((any::<bool>(), any::<bool>()), n),
        ))
    ) {
        let (priorities, assignments) = layers;
        let mut system = registry();
        for (i, (priority, (value, blacklisted))) in priorities.iter().zip(&assignments).enumerate() {
            let name = format!("scene{}", i);
            add_scene(&mut system, &name, *priority);
            system.set_value(&name, "pvp", catalog::PVP.value(*value)).unwrap();
            if *blacklisted {
                system
                    .set_target(&name, "pvp", Target::blacklist([ActorId::new("outlaw")]))
                    .unwrap();
            }
        }

        let mut by_priority: Vec<(i32, bool, bool)> = priorities
            .iter()
            .zip(&assignments)
            .map(|(p, (v, b))| (*p, *v, *b))
            .collect();
        by_priority.sort_by(|a, b| b.0.cmp(&a.0));

        let citizen = by_priority[0].1;
        let outlaw = by_priority
            .iter()
            .find(|(_, _, blacklisted)| !blacklisted)
            .map_or(true, |(_, value, _)| *value);

        let point = center();
        prop_assert_eq!(
            system.evaluate_as(catalog::PVP, Some(&ActorId::new("citizen")), &point).unwrap(),
            citizen
        );
        prop_assert_eq!(
            system.evaluate_as(catalog::PVP, Some(&ActorId::new("outlaw")), &point).unwrap(),
            outlaw
        );
    }

    #[test]
    fn test_poly_layers_fold_from_lowest_priority(
        layers in (1usize..6).prop_flat_map(|n| (
            shuffled_priorities(n),
            prop::collection::vec((any::<bool>(), letter_set()), n),
        ))
    ) {
        let (priorities, edits) = layers;
        let mut system = registry();
        for (i, (priority, (adds, letters))) in priorities.iter().zip(&edits).enumerate() {
            let name = format!("scene{}", i);
            add_scene(&mut system, &name, *priority);
            let set = AltSet::of(letters.iter().copied());
            let value = if *adds { PolyValue::additive(set) } else { PolyValue::subtractive(set) };
            system.set_value(&name, "letters", value.into()).unwrap();
        }

        let mut ascending: Vec<(i32, bool, BTreeSet<&str>)> = priorities
            .iter()
            .zip(&edits)
            .map(|(p, (a, l))| (*p, *a, l.clone()))
            .collect();
        ascending.sort_by_key(|layer| layer.0);
        let mut expected: BTreeSet<&str> = ["a", "b", "c"].into_iter().collect();
        for (_, adds, letters) in &ascending {
            if *adds {
                expected.extend(letters.iter().copied());
            } else {
                expected.retain(|l| !letters.contains(l));
            }
        }

        let evaluation = system.resolve("letters", None, &center()).unwrap();
        prop_assert_eq!(evaluation.value, Datum::Set(AltSet::of(expected)));
        prop_assert_eq!(evaluation.trace.len(), ascending.len());
    }

    #[test]
    fn test_unset_without_assignment_is_idempotent(
        key_index in 0usize..16,
        on_global in any::<bool>(),
    ) {
        let mut system = registry();
        add_scene(&mut system, "plaza", 2);
        let keys: Vec<String> = system
            .keys()
            .iter()
            .filter(|k| on_global || !k.is_global())
            .map(|k| k.id().to_string())
            .collect();
        let key = &keys[key_index % keys.len()];
        let host = if on_global { "_global" } else { "plaza" };

        let before = system.snapshot();
        prop_assert_eq!(system.unset_value(host, key).unwrap(), None);
        prop_assert_eq!(system.unset_value(host, key).unwrap(), None);
        prop_assert_eq!(system.snapshot(), before);
    }
}
