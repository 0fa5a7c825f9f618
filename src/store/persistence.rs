//! Sled-backed host store.
//!
//! Layout: the default tree holds the domain list and the global record under
//! fixed keys; the `scenes` tree holds one bincode-encoded [`SceneRecord`] per
//! case-folded scene name.

use crate::error::StorageError;
use crate::store::{GlobalRecord, HostStorage, SceneRecord, SystemSnapshot};
use crate::types::name_key;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

const DOMAINS_KEY: &[u8] = b"meta:domains";
const GLOBAL_KEY: &[u8] = b"meta:global";
const SCENES_TREE: &str = "scenes";

/// Sled-based implementation of HostStorage
pub struct SledHostStore {
    db: sled::Db,
    scenes: sled::Tree,
}

fn encode<T: Serialize>(value: &T, what: &str) -> Result<Vec<u8>, StorageError> {
    bincode::serialize(value)
        .map_err(|e| StorageError::Encoding(format!("Failed to serialize {}: {}", what, e)))
}

fn decode<T: DeserializeOwned>(bytes: &[u8], what: &str) -> Result<T, StorageError> {
    bincode::deserialize(bytes)
        .map_err(|e| StorageError::Corrupt(format!("Failed to deserialize {}: {}", what, e)))
}

impl SledHostStore {
    /// Open or create the database directory at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = sled::open(path.as_ref()).map_err(|e| {
            StorageError::Database(format!(
                "Failed to open sled database at {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let scenes = db.open_tree(SCENES_TREE)?;
        Ok(Self { db, scenes })
    }

    /// Get the underlying sled database
    pub fn db(&self) -> &sled::Db {
        &self.db
    }
}

impl HostStorage for SledHostStore {
    fn load(&self) -> Result<SystemSnapshot, StorageError> {
        let domains = match self.db.get(DOMAINS_KEY)? {
            Some(bytes) => decode(&bytes, "domain list")?,
            None => Vec::new(),
        };
        let global: GlobalRecord = match self.db.get(GLOBAL_KEY)? {
            Some(bytes) => decode(&bytes, "global record")?,
            None => GlobalRecord::default(),
        };
        let mut scenes = Vec::new();
        for item in self.scenes.iter() {
            let (_, value) = item?;
            let record: SceneRecord = decode(&value, "scene record")?;
            scenes.push(record);
        }
        debug!(scenes = scenes.len(), "Loaded host state from sled");
        Ok(SystemSnapshot {
            global,
            domains,
            scenes,
        })
    }

    fn save(&self, snapshot: &SystemSnapshot) -> Result<(), StorageError> {
        self.db.insert(DOMAINS_KEY, encode(&snapshot.domains, "domain list")?)?;
        self.db.insert(GLOBAL_KEY, encode(&snapshot.global, "global record")?)?;

        let mut kept = HashSet::new();
        for record in &snapshot.scenes {
            let key = name_key(&record.name);
            self.scenes
                .insert(key.as_bytes(), encode(record, "scene record")?)?;
            kept.insert(key.into_bytes());
        }
        for item in self.scenes.iter() {
            let (key, _) = item?;
            if !kept.contains(&key[..]) {
                self.scenes.remove(key)?;
            }
        }

        self.db.flush()?;
        debug!(scenes = snapshot.scenes.len(), "Saved host state to sled");
        Ok(())
    }

    fn delete_scene(&self, name: &str) -> Result<(), StorageError> {
        self.scenes.remove(name_key(name).as_bytes())?;
        self.db.flush()?;
        Ok(())
    }
}
