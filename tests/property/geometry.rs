//! Property-based tests for volume containment

use proptest::prelude::*;
use warden::geometry::Shape;

fn coord() -> impl Strategy<Value = f64> {
    -1000.0..1000.0f64
}

fn extent() -> impl Strategy<Value = f64> {
    0.5..200.0f64
}

proptest! {
    #[test]
    fn test_cuboid_contains_center_and_corners(
        x in coord(), y in coord(), z in coord(),
        dx in extent(), dy in extent(), dz in extent(),
    ) {
        let cuboid = Shape::cuboid(x, y, z, x + dx, y + dy, z + dz).unwrap();
        prop_assert!(cuboid.contains(x + dx / 2.0, y + dy / 2.0, z + dz / 2.0));
        prop_assert!(cuboid.contains(x, y, z));
        prop_assert!(cuboid.contains(x + dx, y + dy, z + dz));
        prop_assert!(!cuboid.contains(x + dx + 1.0, y, z));
        prop_assert!(!cuboid.contains(x, y - 1.0, z));
    }

    #[test]
    fn test_cuboid_corner_order_is_irrelevant(
        x1 in coord(), y1 in coord(), z1 in coord(),
        dx in extent(), dy in extent(), dz in extent(),
    ) {
        let a = Shape::cuboid(x1, y1, z1, x1 + dx, y1 + dy, z1 + dz).unwrap();
        let b = Shape::cuboid(x1 + dx, y1, z1 + dz, x1, y1 + dy, z1).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn test_slab_ignores_horizontal_position(
        y in coord(), height in extent(),
        px in -1.0e9..1.0e9f64, pz in -1.0e9..1.0e9f64,
    ) {
        let slab = Shape::slab(y, height).unwrap();
        prop_assert!(slab.contains(px, y + height / 2.0, pz));
        prop_assert!(!slab.contains(px, y + height + 1.0, pz));
        prop_assert!(!slab.contains(px, y - 1.0, pz));
    }

    #[test]
    fn test_contained_points_lie_in_bounding_box(
        cx in coord(), cy in coord(), cz in coord(), radius in extent(),
        px in coord(), py in coord(), pz in coord(),
    ) {
        let shapes = [
            Shape::sphere(cx, cy, cz, radius).unwrap(),
            Shape::cylinder(cx, cy, cz, radius, radius * 2.0).unwrap(),
        ];
        for shape in &shapes {
            if shape.contains(px, py, pz) {
                let bounds = shape.bounding_box();
                for (axis, v) in [px, py, pz].into_iter().enumerate() {
                    prop_assert!(bounds.min[axis] <= v && v <= bounds.max[axis]);
                }
            }
        }
    }

    #[test]
    fn test_sphere_matches_distance(
        cx in coord(), cy in coord(), cz in coord(), radius in extent(),
        px in coord(), py in coord(), pz in coord(),
    ) {
        let sphere = Shape::sphere(cx, cy, cz, radius).unwrap();
        let d2 = (px - cx).powi(2) + (py - cy).powi(2) + (pz - cz).powi(2);
        prop_assert_eq!(sphere.contains(px, py, pz), d2 <= radius * radius);
    }
}

#[test]
fn test_degenerate_shapes_rejected() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(coord(), -100.0..=0.0f64), |(origin, bad)| {
            assert!(Shape::cuboid(origin, origin, origin, origin, origin + 1.0, origin + 1.0).is_err());
            assert!(Shape::sphere(origin, origin, origin, bad).is_err());
            assert!(Shape::slab(origin, bad).is_err());
            assert!(Shape::cylinder(origin, origin, origin, bad, 1.0).is_err());
            Ok(())
        })
        .unwrap();
}
