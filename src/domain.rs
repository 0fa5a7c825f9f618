//! Domains
//!
//! A domain is a named coordinate space (a world, a dimension). It indexes the
//! volumes currently placed in it; containment queries are linear scans over
//! that index.

use crate::geometry::Volume;
use crate::types::VolumeId;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Domain {
    name: String,
    volumes: Vec<VolumeId>,
}

impl Domain {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            volumes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Volume ids in insertion order.
    pub fn volumes(&self) -> &[VolumeId] {
        &self.volumes
    }

    pub fn holds(&self, id: VolumeId) -> bool {
        self.volumes.contains(&id)
    }

    pub(crate) fn attach(&mut self, id: VolumeId) {
        if !self.holds(id) {
            self.volumes.push(id);
        }
    }

    /// Returns false when the volume was not indexed here.
    pub(crate) fn detach(&mut self, id: VolumeId) -> bool {
        let before = self.volumes.len();
        self.volumes.retain(|v| *v != id);
        self.volumes.len() != before
    }

    /// All indexed volumes containing the coordinates.
    pub fn containing<'a>(
        &'a self,
        volumes: &'a HashMap<VolumeId, Volume>,
        x: f64,
        y: f64,
        z: f64,
    ) -> impl Iterator<Item = &'a Volume> + 'a {
        self.volumes
            .iter()
            .filter_map(move |id| volumes.get(id))
            .filter(move |volume| volume.contains(x, y, z))
    }
}
