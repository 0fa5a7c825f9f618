//! Shared test utilities for integration tests
//!
//! Registry fixtures plus isolation of the environment variables the config
//! loader reads, so tests that touch them can run in parallel.

use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use warden::context::{CapabilityCheck, EngineContext};
use warden::geometry::Shape;
use warden::setting::{catalog, AltSet, SettingKey, SettingKeyRegistry, StringSetCodec};
use warden::{HostSystem, Point};

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const ISOLATED_VARS: [&str; 3] = ["HOME", "XDG_CONFIG_HOME", "WARDEN_ENV"];

/// Run `f` with `XDG_CONFIG_HOME` pointing into `test_dir` and `WARDEN_ENV`
/// unset. The original values are restored afterwards.
pub fn with_isolated_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let saved: Vec<(&str, Option<String>)> = ISOLATED_VARS
        .iter()
        .map(|name| (*name, std::env::var(name).ok()))
        .collect();

    let config_home = test_dir.path().join("xdg");
    let home = test_dir.path().join("home");
    std::fs::create_dir_all(&config_home).unwrap();
    std::fs::create_dir_all(&home).unwrap();
    std::env::set_var("HOME", &home);
    std::env::set_var("XDG_CONFIG_HOME", &config_home);
    std::env::remove_var("WARDEN_ENV");

    let result = f();

    for (name, value) in saved {
        match value {
            Some(v) => std::env::set_var(name, v),
            None => std::env::remove_var(name),
        }
    }
    result
}

/// Standard catalog plus a `letters` poly key defaulting to {a, b, c}.
pub fn test_keys() -> SettingKeyRegistry {
    let mut builder = SettingKeyRegistry::builder();
    catalog::register_standard(&mut builder).unwrap();
    builder
        .register(
            SettingKey::poly("letters", AltSet::of(["a", "b", "c"]), StringSetCodec::new())
                .build()
                .unwrap(),
        )
        .unwrap();
    builder.build()
}

/// Registry with the `overworld` and `nether` domains registered.
pub fn system_with(capabilities: Arc<dyn CapabilityCheck>) -> HostSystem {
    let mut system = HostSystem::new(test_keys(), EngineContext::new(capabilities));
    system.register_domain("overworld").unwrap();
    system.register_domain("nether").unwrap();
    system
}

pub fn system() -> HostSystem {
    system_with(Arc::new(warden::context::NoCapabilities))
}

pub fn cube(min: f64, max: f64) -> Shape {
    Shape::cuboid(min, min, min, max, max, max).unwrap()
}

pub fn at(x: f64, y: f64, z: f64) -> Point {
    Point::new("overworld", x, y, z)
}

/// Create `name` with one cube volume in the overworld.
pub fn scene_with_cube(system: &mut HostSystem, name: &str, priority: i32, min: f64, max: f64) {
    system.create_scene(name, priority).unwrap();
    system.add_volume(name, "overworld", cube(min, max)).unwrap();
}
