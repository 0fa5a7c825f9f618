//! Warden facade: shared access and storage orchestration.

use super::test_utils::{at, cube, test_keys};
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;
use warden::config::{StorageBackend, WardenConfig};
use warden::context::NoCapabilities;
use warden::setting::{catalog, Datum};
use warden::{ApiError, Warden};

fn sled_config(temp_dir: &TempDir) -> WardenConfig {
    let mut config = WardenConfig::default();
    config.storage.backend = StorageBackend::Sled;
    config.storage.path = temp_dir.path().join("store");
    config
}

#[test]
fn test_readers_see_whole_edits() {
    let temp_dir = TempDir::new().unwrap();
    let warden = Arc::new(
        Warden::open(&sled_config(&temp_dir), test_keys(), Arc::new(NoCapabilities)).unwrap(),
    );
    warden
        .write(|sys| -> Result<(), ApiError> {
            sys.register_domain("overworld")?;
            sys.create_scene("arena", 1)?;
            sys.add_volume("arena", "overworld", cube(0.0, 10.0))?;
            Ok(())
        })
        .unwrap();

    let writer = {
        let warden = Arc::clone(&warden);
        thread::spawn(move || {
            for i in 0..50 {
                warden
                    .write(|sys| -> Result<(), ApiError> {
                        // Both toggles flip under one lock.
                        let value = i % 2 == 0;
                        sys.set_value("arena", "heal-amount", catalog::HEAL_AMOUNT.value(i % 20))?;
                        sys.set_value("arena", "pvp", catalog::PVP.value(value))?;
                        sys.set_value("arena", "fire-spread", catalog::FIRE_SPREAD.value(value))?;
                        Ok(())
                    })
                    .unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let warden = Arc::clone(&warden);
            thread::spawn(move || {
                for _ in 0..50 {
                    let (pvp, fire) = warden.read(|sys| {
                        let point = at(5.0, 5.0, 5.0);
                        (
                            sys.evaluate_as(catalog::PVP, None, &point).unwrap(),
                            sys.evaluate_as(catalog::FIRE_SPREAD, None, &point).unwrap(),
                        )
                    });
                    assert_eq!(pvp, fire);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
}

#[test]
fn test_open_loads_saved_state() {
    let temp_dir = TempDir::new().unwrap();
    {
        let warden =
            Warden::open(&sled_config(&temp_dir), test_keys(), Arc::new(NoCapabilities)).unwrap();
        warden
            .write(|sys| -> Result<(), ApiError> {
                sys.register_domain("overworld")?;
                sys.create_scene("spawn", 3)?;
                sys.add_volume("spawn", "overworld", cube(-5.0, 5.0))?;
                sys.set_value("spawn", "pvp", catalog::PVP.value(false))?;
                Ok(())
            })
            .unwrap();
        warden.save().unwrap();
    }

    let warden =
        Warden::open(&sled_config(&temp_dir), test_keys(), Arc::new(NoCapabilities)).unwrap();
    let evaluation = warden.resolve("pvp", None, &at(0.0, 0.0, 0.0)).unwrap();
    assert_eq!(evaluation.value, Datum::Bool(false));

    warden.destroy_scene("spawn").unwrap();
    assert!(warden.storage().load().unwrap().scenes.is_empty());
}

#[test]
fn test_open_rejects_corrupt_json_state() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("state.json");
    std::fs::write(&path, "[1, 2").unwrap();

    let mut config = WardenConfig::default();
    config.storage.backend = StorageBackend::Json;
    config.storage.path = path;
    let result = Warden::open(&config, test_keys(), Arc::new(NoCapabilities));
    assert!(matches!(result, Err(ApiError::StorageError(_))));
}
