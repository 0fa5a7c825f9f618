//! Merge rules: built-in defaults at the lowest layer.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with the registry, resolution and storage
/// defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("registry.reserved_prefix", "_")?
        .set_default("registry.global_name", "_global")?
        .set_default("registry.max_priority", i64::from(i32::MAX))?
        .set_default("resolution.unrestricted_capability", "warden.unrestricted")?
        .set_default("resolution.anonymous_policy", "reject")?
        .set_default("storage.backend", "sled")?
        .set_default("storage.path", ".warden/store")
}
