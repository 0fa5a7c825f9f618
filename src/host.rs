//! Host Hierarchy
//!
//! A host is a named scope that owns setting assignments and a priority. The
//! [`Global`] host contains every point and sits below all scenes; a
//! [`Scene`] contains the points of its volumes. Both implement [`Host`], which
//! is the only view the resolution engine needs.

use crate::setting::{SettingValue, Target};
use crate::types::{SceneId, VolumeId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Priority of the global host. Scene priorities are never negative.
pub const GLOBAL_PRIORITY: i32 = -1;

/// What one host says about one key.
///
/// A target without a value is legal: it becomes the pending target for the
/// next lower host that does carry a value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub value: Option<SettingValue>,
    pub target: Option<Target>,
}

impl Assignment {
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.target.is_none()
    }
}

/// Assignments of a host, keyed by setting key id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingAssignments {
    entries: BTreeMap<String, Assignment>,
}

impl SettingAssignments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Assignment> {
        self.entries.get(key)
    }

    pub fn value(&self, key: &str) -> Option<&SettingValue> {
        self.entries.get(key).and_then(|a| a.value.as_ref())
    }

    pub fn target(&self, key: &str) -> Option<&Target> {
        self.entries.get(key).and_then(|a| a.target.as_ref())
    }

    pub(crate) fn target_mut(&mut self, key: &str) -> Option<&mut Target> {
        self.entries.get_mut(key).and_then(|a| a.target.as_mut())
    }

    /// Returns the replaced value, if any.
    pub(crate) fn set_value(&mut self, key: &str, value: SettingValue) -> Option<SettingValue> {
        self.entries.entry(key.to_string()).or_default().value.replace(value)
    }

    pub(crate) fn unset_value(&mut self, key: &str) -> Option<SettingValue> {
        let previous = self.entries.get_mut(key).and_then(|a| a.value.take());
        self.prune(key);
        previous
    }

    pub(crate) fn set_target(&mut self, key: &str, target: Target) -> Option<Target> {
        self.entries.entry(key.to_string()).or_default().target.replace(target)
    }

    pub(crate) fn remove_target(&mut self, key: &str) -> Option<Target> {
        let previous = self.entries.get_mut(key).and_then(|a| a.target.take());
        self.prune(key);
        previous
    }

    fn prune(&mut self, key: &str) {
        if self.entries.get(key).map_or(false, Assignment::is_empty) {
            self.entries.remove(key);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Assignment)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read view shared by the global host and scenes.
pub trait Host: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Higher wins.
    fn priority(&self) -> i32;

    fn settings(&self) -> &SettingAssignments;

    fn is_global(&self) -> bool;
}

/// The universal host.
#[derive(Debug, Clone)]
pub struct Global {
    name: String,
    pub(crate) settings: SettingAssignments,
}

impl Global {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            settings: SettingAssignments::new(),
        }
    }
}

impl Host for Global {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        GLOBAL_PRIORITY
    }

    fn settings(&self) -> &SettingAssignments {
        &self.settings
    }

    fn is_global(&self) -> bool {
        true
    }
}

/// A user-defined spatial host.
#[derive(Debug, Clone)]
pub struct Scene {
    pub(crate) id: SceneId,
    pub(crate) name: String,
    pub(crate) priority: i32,
    pub(crate) volumes: Vec<VolumeId>,
    pub(crate) settings: SettingAssignments,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl Scene {
    pub(crate) fn new(id: SceneId, name: String, priority: i32, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            priority,
            volumes: Vec::new(),
            settings: SettingAssignments::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> SceneId {
        self.id
    }

    pub fn handle(&self) -> SceneHandle {
        SceneHandle { id: self.id }
    }

    /// Owned volumes in insertion order.
    pub fn volumes(&self) -> &[VolumeId] {
        &self.volumes
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Host for Scene {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn settings(&self) -> &SettingAssignments {
        &self.settings
    }

    fn is_global(&self) -> bool {
        false
    }
}

/// Stable reference to one scene object. Renaming or destroying the scene
/// expires every handle taken before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneHandle {
    pub(crate) id: SceneId,
}

impl SceneHandle {
    pub fn id(&self) -> SceneId {
        self.id
    }
}
