//! Single-file JSON host store, for hand-editable state.

use crate::error::StorageError;
use crate::store::{HostStorage, SystemSnapshot};
use crate::types::name_key;
use std::path::{Path, PathBuf};

pub struct JsonFileHostStore {
    path: PathBuf,
}

impl JsonFileHostStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HostStorage for JsonFileHostStore {
    fn load(&self) -> Result<SystemSnapshot, StorageError> {
        if !self.path.exists() {
            return Ok(SystemSnapshot::default());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&contents).map_err(|e| {
            StorageError::Corrupt(format!("Failed to parse {}: {}", self.path.display(), e))
        })
    }

    /// Writes a sibling temp file and renames it over the target.
    fn save(&self, snapshot: &SystemSnapshot) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| StorageError::Encoding(e.to_string()))?;
        let temp = self.path.with_extension("json.tmp");
        std::fs::write(&temp, json)?;
        std::fs::rename(&temp, &self.path)?;
        Ok(())
    }

    fn delete_scene(&self, name: &str) -> Result<(), StorageError> {
        let mut snapshot = self.load()?;
        let key = name_key(name);
        let before = snapshot.scenes.len();
        snapshot.scenes.retain(|scene| name_key(&scene.name) != key);
        if snapshot.scenes.len() != before {
            self.save(&snapshot)?;
        }
        Ok(())
    }
}
