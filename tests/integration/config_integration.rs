//! Integration tests for configuration layering

use super::test_utils::with_isolated_env;
use std::path::PathBuf;
use tempfile::TempDir;
use warden::config::{ConfigLoader, StorageBackend, WardenConfig};
use warden::context::AnonymousPolicy;
use warden::logging::LogFormat;

fn write(path: PathBuf, contents: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

#[test]
fn test_defaults_without_any_files() {
    let temp_dir = TempDir::new().unwrap();
    let config = with_isolated_env(&temp_dir, || ConfigLoader::load(temp_dir.path())).unwrap();
    assert_eq!(config, WardenConfig::default());
}

#[test]
fn test_workspace_overrides_global_file() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = temp_dir.path().join("workspace");

    let config = with_isolated_env(&temp_dir, || {
        write(
            temp_dir.path().join("xdg/warden/config.toml"),
            r#"
[registry]
max_priority = 50

[logging]
format = "json"
"#,
        );
        write(
            workspace.join("config/config.toml"),
            r#"
[registry]
max_priority = 80

[storage]
backend = "json"
path = "zones.json"
"#,
        );
        ConfigLoader::load(&workspace)
    })
    .unwrap();

    assert_eq!(config.registry.max_priority, 80);
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.storage.backend, StorageBackend::Json);
    assert_eq!(config.storage.path, PathBuf::from("zones.json"));
}

#[test]
fn test_environment_file_and_variables() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = temp_dir.path().join("workspace");

    let config = with_isolated_env(&temp_dir, || {
        write(
            workspace.join("config/config.toml"),
            "[resolution]\nanonymous_policy = \"reject\"\n",
        );
        write(
            workspace.join("config/staging.toml"),
            "[resolution]\nanonymous_policy = \"treat_as_unlisted\"\n",
        );
        std::env::set_var("WARDEN_ENV", "staging");
        std::env::set_var("WARDEN__REGISTRY__MAX_PRIORITY", "12");
        let result = ConfigLoader::load(&workspace);
        std::env::remove_var("WARDEN__REGISTRY__MAX_PRIORITY");
        result
    })
    .unwrap();

    assert_eq!(
        config.resolution.anonymous_policy,
        AnonymousPolicy::TreatAsUnlisted
    );
    assert_eq!(config.registry.max_priority, 12);
}

#[test]
fn test_invalid_file_value_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("bad.toml");
    std::fs::write(&config_file, "[storage]\nbackend = \"postgres\"\n").unwrap();
    assert!(ConfigLoader::load_from_file(&config_file).is_err());
}
