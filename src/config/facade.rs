//! Config loading entry point.

use super::merge::merge_policy;
use super::sources::{global_file, workspace_file};
use super::WardenConfig;
use config::{ConfigError, Environment, File};
use std::path::Path;

/// Assembles the configuration layers.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load all layers for a workspace.
    pub fn load(workspace_root: &Path) -> Result<WardenConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        builder
            .add_source(
                Environment::with_prefix("WARDEN")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Load defaults plus one explicit file.
    pub fn load_from_file(path: &Path) -> Result<WardenConfig, ConfigError> {
        merge_policy::builder_with_defaults()?
            .add_source(File::from(path))
            .build()?
            .try_deserialize()
    }

    /// Built-in defaults only.
    pub fn defaults() -> Result<WardenConfig, ConfigError> {
        merge_policy::builder_with_defaults()?.build()?.try_deserialize()
    }
}
