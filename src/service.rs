//! Warden Service
//!
//! Embedding facade over a [`HostSystem`]. Readers share the registry through
//! a read lock while any mutation takes the write lock, so a resolution never
//! observes a half-applied edit. Storage is only touched by explicit
//! [`Warden::load`] and [`Warden::save`] calls plus scene destruction.

use crate::config::WardenConfig;
use crate::context::{CapabilityCheck, EngineContext};
use crate::error::ApiError;
use crate::evaluate::Evaluation;
use crate::host::Scene;
use crate::setting::SettingKeyRegistry;
use crate::store::{open_storage, HostStorage};
use crate::system::{HostSystem, PriorityShift};
use crate::types::{ActorId, Point};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Shared, storage-backed access to one registry
pub struct Warden {
    system: RwLock<HostSystem>,
    storage: Arc<dyn HostStorage>,
}

impl Warden {
    pub fn new(system: HostSystem, storage: Arc<dyn HostStorage>) -> Self {
        Self {
            system: RwLock::new(system),
            storage,
        }
    }

    /// Build a registry from configuration, open the configured backend and
    /// load whatever state it holds.
    pub fn open(
        config: &WardenConfig,
        keys: SettingKeyRegistry,
        capabilities: Arc<dyn CapabilityCheck>,
    ) -> Result<Self, ApiError> {
        config.validate().map_err(|errors| {
            ApiError::ConfigError(
                errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        })?;

        let ctx = EngineContext::from_config(&config.resolution, capabilities);
        let system = HostSystem::with_config(Arc::new(keys), ctx, config.registry.clone());
        let storage = open_storage(&config.storage)?;
        let warden = Self::new(system, storage);
        warden.load()?;
        Ok(warden)
    }

    pub fn storage(&self) -> &Arc<dyn HostStorage> {
        &self.storage
    }

    /// Replace the in-memory registry with the stored state.
    pub fn load(&self) -> Result<(), ApiError> {
        let snapshot = self.storage.load()?;
        let scenes = snapshot.scenes.len();
        self.system.write().restore(snapshot)?;
        info!(scenes, "Registry loaded from storage");
        Ok(())
    }

    /// Write the current registry to storage.
    pub fn save(&self) -> Result<(), ApiError> {
        let snapshot = self.system.read().snapshot();
        self.storage.save(&snapshot)?;
        debug!(scenes = snapshot.scenes.len(), "Registry saved to storage");
        Ok(())
    }

    /// Run `f` under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&HostSystem) -> R) -> R {
        f(&self.system.read())
    }

    /// Run `f` under the write lock.
    pub fn write<R>(&self, f: impl FnOnce(&mut HostSystem) -> R) -> R {
        f(&mut self.system.write())
    }

    pub fn resolve(
        &self,
        key_id: &str,
        actor: Option<&ActorId>,
        point: &Point,
    ) -> Result<Evaluation, ApiError> {
        self.system.read().resolve(key_id, actor, point)
    }

    /// Change a scene's priority. Scenes that could not be moved out of the
    /// way are reported in the returned shift and logged.
    pub fn set_priority(&self, scene: &str, priority: i32) -> Result<PriorityShift, ApiError> {
        let shift = self.system.write().set_priority(scene, priority)?;
        if !shift.is_complete() {
            warn!(
                scene,
                priority,
                success_count = shift.success_count,
                fail_count = shift.fail_count,
                "Priority shift left some overlapping scenes at their old priority"
            );
        }
        Ok(shift)
    }

    /// Destroy a scene and drop its stored record. The stored record goes
    /// first; if storage fails the scene stays registered.
    pub fn destroy_scene(&self, name: &str) -> Result<Scene, ApiError> {
        let mut system = self.system.write();
        let stored_name = system.scene(name)?.name.clone();
        self.storage.delete_scene(&stored_name)?;
        system.destroy_scene(&stored_name)
    }
}
