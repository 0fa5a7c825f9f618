//! Configuration System
//!
//! Layered configuration for the registry, resolution policies, storage and
//! logging. Layers from lowest to highest precedence: built-in defaults, the
//! global user file, the workspace `config/config.toml`, the workspace
//! `config/{WARDEN_ENV}.toml`, then `WARDEN__SECTION__FIELD` environment
//! variables.

use crate::context::{AnonymousPolicy, DEFAULT_UNRESTRICTED_CAPABILITY};
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WardenConfig {
    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub resolution: ResolutionConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Naming and priority rules enforced by `HostSystem`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Scene names may not start with this prefix
    #[serde(default = "default_reserved_prefix")]
    pub reserved_prefix: String,

    /// Name of the global host
    #[serde(default = "default_global_name")]
    pub global_name: String,

    /// Highest priority a scene may hold
    #[serde(default = "default_max_priority")]
    pub max_priority: i32,
}

fn default_reserved_prefix() -> String {
    "_".to_string()
}

fn default_global_name() -> String {
    "_global".to_string()
}

fn default_max_priority() -> i32 {
    i32::MAX
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            reserved_prefix: default_reserved_prefix(),
            global_name: default_global_name(),
            max_priority: default_max_priority(),
        }
    }
}

/// Policies used while testing targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionConfig {
    /// Capability that bypasses targets on player-restrictive keys
    #[serde(default = "default_unrestricted_capability")]
    pub unrestricted_capability: String,

    #[serde(default)]
    pub anonymous_policy: AnonymousPolicy,
}

fn default_unrestricted_capability() -> String {
    DEFAULT_UNRESTRICTED_CAPABILITY.to_string()
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            unrestricted_capability: default_unrestricted_capability(),
            anonymous_policy: AnonymousPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sled,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Sled database directory, or the JSON state file
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".warden/store")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_store_path(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Registry(String),
    Resolution(String),
    Storage(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Registry(msg) => write!(f, "Registry: {}", msg),
            ValidationError::Resolution(msg) => write!(f, "Resolution: {}", msg),
            ValidationError::Storage(msg) => write!(f, "Storage: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl WardenConfig {
    /// Validate the entire configuration, collecting every problem
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let registry = &self.registry;
        if registry.reserved_prefix.is_empty() {
            errors.push(ValidationError::Registry(
                "reserved_prefix cannot be empty".to_string(),
            ));
        }
        if registry.global_name.trim().is_empty() {
            errors.push(ValidationError::Registry(
                "global_name cannot be empty".to_string(),
            ));
        } else if !registry.reserved_prefix.is_empty()
            && !registry.global_name.starts_with(&registry.reserved_prefix)
        {
            errors.push(ValidationError::Registry(format!(
                "global_name '{}' must start with the reserved prefix '{}'",
                registry.global_name, registry.reserved_prefix
            )));
        }
        if registry.max_priority < 0 {
            errors.push(ValidationError::Registry(format!(
                "max_priority must not be negative, got {}",
                registry.max_priority
            )));
        }

        if self.resolution.unrestricted_capability.trim().is_empty() {
            errors.push(ValidationError::Resolution(
                "unrestricted_capability cannot be empty".to_string(),
            ));
        }

        if self.storage.path.as_os_str().is_empty() {
            errors.push(ValidationError::Storage("Store path cannot be empty".to_string()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
