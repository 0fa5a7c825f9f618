//! Host Store
//!
//! Persistence port for registry state. The registry converts itself to and
//! from a [`SystemSnapshot`]; a [`HostStorage`] implementation decides how the
//! snapshot is encoded and where it lives. Storage is never touched on the
//! resolution path: embedding environments call `load` at startup and `save`
//! when they choose to.

pub mod json_file;
pub mod persistence;

pub use json_file::JsonFileHostStore;
pub use persistence::SledHostStore;

use crate::config::{StorageBackend, StorageConfig};
use crate::error::StorageError;
use crate::geometry::Shape;
use crate::setting::{SettingValue, Target};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One volume of a stored scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeRecord {
    /// Case-folded domain name
    pub domain: String,
    pub shape: Shape,
}

/// One key's assignment on a stored host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub key: String,
    pub value: Option<SettingValue>,
    pub target: Option<Target>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneRecord {
    pub name: String,
    pub priority: i32,
    pub volumes: Vec<VolumeRecord>,
    pub settings: Vec<AssignmentRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalRecord {
    pub settings: Vec<AssignmentRecord>,
}

/// Full registry state: registered domains, global assignments and scenes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub global: GlobalRecord,
    pub domains: Vec<String>,
    pub scenes: Vec<SceneRecord>,
}

/// Storage port for registry state
pub trait HostStorage: Send + Sync {
    /// Load stored state. An empty store yields an empty snapshot.
    fn load(&self) -> Result<SystemSnapshot, StorageError>;

    /// Replace stored state with `snapshot`.
    fn save(&self, snapshot: &SystemSnapshot) -> Result<(), StorageError>;

    /// Drop one scene's stored state. Unknown names are ignored.
    fn delete_scene(&self, name: &str) -> Result<(), StorageError>;
}

/// Open the backend selected in configuration.
pub fn open_storage(config: &StorageConfig) -> Result<Arc<dyn HostStorage>, StorageError> {
    Ok(match config.backend {
        StorageBackend::Sled => Arc::new(SledHostStore::new(&config.path)?),
        StorageBackend::Json => Arc::new(JsonFileHostStore::new(&config.path)),
    })
}
