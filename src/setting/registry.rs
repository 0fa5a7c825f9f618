//! Setting key registry: the fixed table of keys known to a `HostSystem`.

use crate::error::ApiError;
use crate::setting::key::{KeyShape, PolyKey, SettingKey, UnaryKey};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Collects keys before the registry is locked.
#[derive(Debug, Default)]
pub struct SettingKeyRegistryBuilder {
    keys: BTreeMap<String, Arc<SettingKey>>,
}

impl SettingKeyRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key. Ids are unique.
    pub fn register(&mut self, key: SettingKey) -> Result<&mut Self, ApiError> {
        if self.keys.contains_key(key.id()) {
            return Err(ApiError::InvalidArgument(format!(
                "Setting key already registered: {}",
                key.id()
            )));
        }
        self.keys.insert(key.id().to_string(), Arc::new(key));
        Ok(self)
    }

    /// Lock the table. No key can be added afterwards.
    pub fn build(self) -> SettingKeyRegistry {
        debug!(key_count = self.keys.len(), "Setting key registry locked");
        SettingKeyRegistry { keys: self.keys }
    }
}

/// Immutable, id-ordered key table.
#[derive(Debug, Clone, Default)]
pub struct SettingKeyRegistry {
    keys: BTreeMap<String, Arc<SettingKey>>,
}

impl SettingKeyRegistry {
    pub fn builder() -> SettingKeyRegistryBuilder {
        SettingKeyRegistryBuilder::new()
    }

    /// Look up a key by id
    pub fn get(&self, id: &str) -> Result<&Arc<SettingKey>, ApiError> {
        self.keys
            .get(id)
            .ok_or_else(|| ApiError::SettingKeyNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.keys.contains_key(id)
    }

    /// Resolve a typed unary handle, checking the registered shape.
    pub fn unary<T>(&self, handle: UnaryKey<T>) -> Result<&Arc<SettingKey>, ApiError>
    where
        T: crate::setting::datum::SettingData,
    {
        self.expect_shape(handle.id(), KeyShape::Unary)
    }

    pub fn poly(&self, handle: PolyKey) -> Result<&Arc<SettingKey>, ApiError> {
        self.expect_shape(handle.id(), KeyShape::Poly)
    }

    fn expect_shape(&self, id: &str, shape: KeyShape) -> Result<&Arc<SettingKey>, ApiError> {
        let key = self.get(id)?;
        if key.shape() != shape {
            return Err(ApiError::KeyMismatch {
                key: id.to_string(),
                expected: match shape {
                    KeyShape::Unary => "single value",
                    KeyShape::Poly => "multiple value",
                },
            });
        }
        Ok(key)
    }

    /// All keys in id order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<SettingKey>> {
        self.keys.values()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
