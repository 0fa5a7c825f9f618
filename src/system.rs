//! Host Registry
//!
//! `HostSystem` owns the global host, the domain map, every scene and the
//! volume table. Mutations validate their preconditions before touching any
//! state, so a failed call leaves the registry exactly as it was. Scene
//! objects are identified by [`SceneId`]; renaming or destroying a scene
//! retires its id, and handles holding a retired id fail with
//! [`ApiError::Expired`].
//!
//! The registry performs no locking. Callers serialize mutations against
//! reads, see [`crate::service::Warden`].

use crate::config::RegistryConfig;
use crate::context::EngineContext;
use crate::domain::Domain;
use crate::error::ApiError;
use crate::evaluate::{compare_hosts, evaluate, order_hosts, Evaluation};
use crate::geometry::{BoundingBox, Shape, Volume, ZoneType};
use crate::host::{Assignment, Global, Host, Scene, SceneHandle, SettingAssignments};
use crate::setting::{
    AltSet, PolyKey, SettingData, SettingKey, SettingKeyRegistry, SettingValue, Target, UnaryKey,
};
use crate::store::{
    AssignmentRecord, GlobalRecord, SceneRecord, SystemSnapshot, VolumeRecord,
};
use crate::types::{name_key, ActorId, Point, SceneId, VolumeId};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tracing::debug;

/// Outcome of a priority change, including scenes displaced by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PriorityShift {
    pub success_count: usize,
    pub fail_count: usize,
}

impl PriorityShift {
    pub fn is_complete(&self) -> bool {
        self.fail_count == 0
    }
}

pub struct HostSystem {
    ctx: EngineContext,
    keys: Arc<SettingKeyRegistry>,
    config: RegistryConfig,
    global: Global,
    domains: BTreeMap<String, Domain>,
    scenes: HashMap<String, Scene>,
    scene_keys: HashMap<SceneId, String>,
    /// Last name of every retired scene id, kept so stale handles report
    /// `Expired` instead of `SceneNotFound`. Grows by one entry per rename,
    /// destroy and restored-over scene and is never pruned; ids are not reused.
    retired: HashMap<SceneId, String>,
    volumes: HashMap<VolumeId, Volume>,
    next_scene_id: u64,
    next_volume_id: u64,
}

impl HostSystem {
    pub fn new(keys: SettingKeyRegistry, ctx: EngineContext) -> Self {
        Self::with_config(Arc::new(keys), ctx, RegistryConfig::default())
    }

    pub fn with_config(
        keys: Arc<SettingKeyRegistry>,
        ctx: EngineContext,
        config: RegistryConfig,
    ) -> Self {
        Self {
            global: Global::new(config.global_name.clone()),
            ctx,
            keys,
            config,
            domains: BTreeMap::new(),
            scenes: HashMap::new(),
            scene_keys: HashMap::new(),
            retired: HashMap::new(),
            volumes: HashMap::new(),
            next_scene_id: 1,
            next_volume_id: 1,
        }
    }

    pub fn keys(&self) -> &SettingKeyRegistry {
        &self.keys
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn registry_config(&self) -> &RegistryConfig {
        &self.config
    }

    fn is_global_name(&self, name: &str) -> bool {
        name_key(name) == name_key(&self.config.global_name)
    }

    fn check_scene_name(&self, name: &str, renaming: Option<SceneId>) -> Result<(), ApiError> {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(ApiError::InvalidArgument(format!(
                "Scene name '{}' must be non-empty and contain no whitespace",
                name
            )));
        }
        if name.starts_with(&self.config.reserved_prefix) {
            return Err(ApiError::InvalidArgument(format!(
                "Scene names may not start with '{}'",
                self.config.reserved_prefix
            )));
        }
        if self.is_global_name(name) {
            return Err(ApiError::InvalidArgument(format!(
                "A host named {} already exists",
                name
            )));
        }
        if let Some(existing) = self.scenes.get(&name_key(name)) {
            if Some(existing.id) != renaming {
                return Err(ApiError::InvalidArgument(format!(
                    "A host named {} already exists",
                    existing.name
                )));
            }
        }
        Ok(())
    }

    fn check_priority(&self, priority: i32) -> Result<(), ApiError> {
        if priority < 0 {
            return Err(ApiError::InvalidArgument(format!(
                "Priority must not be negative, got {}",
                priority
            )));
        }
        if priority > self.config.max_priority {
            return Err(ApiError::InvalidArgument(format!(
                "Priority {} exceeds the maximum of {}",
                priority, self.config.max_priority
            )));
        }
        Ok(())
    }

    // Domains

    /// Register a coordinate space. Returns false if it already existed.
    pub fn register_domain(&mut self, name: &str) -> Result<bool, ApiError> {
        if name.trim().is_empty() {
            return Err(ApiError::InvalidArgument(
                "Domain name cannot be empty".to_string(),
            ));
        }
        let key = name_key(name);
        if self.domains.contains_key(&key) {
            return Ok(false);
        }
        self.domains.insert(key, Domain::new(name));
        debug!(domain = name, "Domain registered");
        Ok(true)
    }

    pub fn domain(&self, name: &str) -> Result<&Domain, ApiError> {
        self.domains
            .get(&name_key(name))
            .ok_or_else(|| ApiError::DomainNotFound(name.to_string()))
    }

    pub fn domains(&self) -> impl Iterator<Item = &Domain> {
        self.domains.values()
    }

    // Hosts

    pub fn global(&self) -> &Global {
        &self.global
    }

    pub fn scene(&self, name: &str) -> Result<&Scene, ApiError> {
        self.scenes
            .get(&name_key(name))
            .ok_or_else(|| ApiError::SceneNotFound(name.to_string()))
    }

    fn scene_key_for(&self, id: SceneId) -> Result<&String, ApiError> {
        if let Some(key) = self.scene_keys.get(&id) {
            return Ok(key);
        }
        match self.retired.get(&id) {
            Some(name) => Err(ApiError::Expired(name.clone())),
            None => Err(ApiError::SceneNotFound(id.to_string())),
        }
    }

    pub fn scene_by_handle(&self, handle: SceneHandle) -> Result<&Scene, ApiError> {
        let key = self.scene_key_for(handle.id())?;
        self.scenes
            .get(key)
            .ok_or_else(|| ApiError::SceneNotFound(key.clone()))
    }

    /// Scenes in resolution order.
    pub fn scenes(&self) -> Vec<&Scene> {
        let mut scenes: Vec<&Scene> = self.scenes.values().collect();
        scenes.sort_by(|a, b| compare_hosts(*a, *b));
        scenes
    }

    pub fn host(&self, name: &str) -> Result<&dyn Host, ApiError> {
        if self.is_global_name(name) {
            return Ok(&self.global);
        }
        self.scenes
            .get(&name_key(name))
            .map(|scene| scene as &dyn Host)
            .ok_or_else(|| ApiError::HostNotFound(name.to_string()))
    }

    /// Every host in resolution order, global last.
    pub fn hosts(&self) -> Vec<&dyn Host> {
        let mut hosts: Vec<&dyn Host> = self.scenes.values().map(|s| s as &dyn Host).collect();
        hosts.push(&self.global);
        order_hosts(&mut hosts);
        hosts
    }

    // Scene lifecycle

    pub fn create_scene(&mut self, name: &str, priority: i32) -> Result<SceneHandle, ApiError> {
        self.check_scene_name(name, None)?;
        self.check_priority(priority)?;

        let id = SceneId(self.next_scene_id);
        self.next_scene_id += 1;
        let scene = Scene::new(id, name.to_string(), priority, self.ctx.now());
        let handle = scene.handle();
        let key = name_key(name);
        self.scene_keys.insert(id, key.clone());
        self.scenes.insert(key, scene);
        debug!(scene = name, scene_id = %id, priority, "Scene created");
        Ok(handle)
    }

    /// Remove a scene, detaching its volumes and clearing its assignments.
    /// Handles to the scene expire.
    pub fn destroy_scene(&mut self, name: &str) -> Result<Scene, ApiError> {
        let mut scene = self
            .scenes
            .remove(&name_key(name))
            .ok_or_else(|| ApiError::SceneNotFound(name.to_string()))?;

        for volume_id in &scene.volumes {
            if let Some(volume) = self.volumes.remove(volume_id) {
                if let Some(domain) = self.domains.get_mut(&volume.domain) {
                    domain.detach(*volume_id);
                }
            }
        }
        scene.settings.clear();
        self.scene_keys.remove(&scene.id);
        self.retired.insert(scene.id, scene.name.clone());
        debug!(scene = %scene.name, scene_id = %scene.id, volumes = scene.volumes.len(), "Scene destroyed");
        Ok(scene)
    }

    /// Move a scene to a new name. The scene keeps its volumes, assignments
    /// and priority under a fresh id; the old id expires.
    pub fn rename_scene(&mut self, old: &str, new: &str) -> Result<SceneHandle, ApiError> {
        let old_key = name_key(old);
        let old_id = self
            .scenes
            .get(&old_key)
            .map(|scene| scene.id)
            .ok_or_else(|| ApiError::SceneNotFound(old.to_string()))?;
        self.check_scene_name(new, Some(old_id))?;

        let previous = self
            .scenes
            .remove(&old_key)
            .ok_or_else(|| ApiError::SceneNotFound(old.to_string()))?;
        let new_id = SceneId(self.next_scene_id);
        self.next_scene_id += 1;
        for volume_id in &previous.volumes {
            if let Some(volume) = self.volumes.get_mut(volume_id) {
                volume.scene = new_id;
            }
        }

        let renamed = Scene {
            id: new_id,
            name: new.to_string(),
            priority: previous.priority,
            volumes: previous.volumes,
            settings: previous.settings,
            created_at: previous.created_at,
            updated_at: self.ctx.now(),
        };
        let new_key = name_key(new);
        self.scene_keys.remove(&old_id);
        self.retired.insert(old_id, previous.name.clone());
        self.scene_keys.insert(new_id, new_key.clone());
        self.scenes.insert(new_key, renamed);
        debug!(from = %previous.name, to = new, scene_id = %new_id, "Scene renamed");
        Ok(SceneHandle { id: new_id })
    }

    /// Set a scene's priority.
    ///
    /// Other scenes sharing a domain with overlapping volume bounds and the
    /// same priority are pushed up by one, cascading through the scenes they
    /// in turn collide with. A push beyond the maximum priority is counted
    /// as a failure and leaves that scene where it was.
    pub fn set_priority(&mut self, name: &str, priority: i32) -> Result<PriorityShift, ApiError> {
        let key = name_key(name);
        if !self.scenes.contains_key(&key) {
            return Err(ApiError::SceneNotFound(name.to_string()));
        }
        self.check_priority(priority)?;

        let now = self.ctx.now();
        let mut shift = PriorityShift::default();
        if let Some(scene) = self.scenes.get_mut(&key) {
            scene.priority = priority;
            scene.updated_at = now;
        }
        shift.success_count += 1;

        let mut visited: HashSet<String> = HashSet::from([key.clone()]);
        let mut queue = VecDeque::from([key]);
        while let Some(moved) = queue.pop_front() {
            let Some(moved_priority) = self.scenes.get(&moved).map(|s| s.priority) else {
                continue;
            };
            let moved_bounds = self.scene_bounds(&moved);
            let mut displaced: Vec<String> = self
                .scenes
                .iter()
                .filter(|(other, scene)| {
                    !visited.contains(*other)
                        && scene.priority == moved_priority
                        && bounds_overlap(&moved_bounds, &self.scene_bounds(other))
                })
                .map(|(other, _)| other.clone())
                .collect();
            displaced.sort();

            for other in displaced {
                visited.insert(other.clone());
                let bumped = moved_priority
                    .checked_add(1)
                    .filter(|p| *p <= self.config.max_priority);
                match (bumped, self.scenes.get_mut(&other)) {
                    (Some(bumped), Some(scene)) => {
                        scene.priority = bumped;
                        scene.updated_at = now;
                        shift.success_count += 1;
                        queue.push_back(other);
                    }
                    _ => shift.fail_count += 1,
                }
            }
        }

        debug!(
            scene = name,
            priority,
            success_count = shift.success_count,
            fail_count = shift.fail_count,
            "Scene priority set"
        );
        Ok(shift)
    }

    fn scene_bounds(&self, key: &str) -> Vec<(&str, BoundingBox)> {
        self.scenes
            .get(key)
            .map(|scene| {
                scene
                    .volumes
                    .iter()
                    .filter_map(|id| self.volumes.get(id))
                    .map(|v| (v.domain.as_str(), v.shape.bounding_box()))
                    .collect()
            })
            .unwrap_or_default()
    }

    // Volumes

    pub fn add_volume(&mut self, scene: &str, domain: &str, shape: Shape) -> Result<VolumeId, ApiError> {
        let scene_key = name_key(scene);
        let domain_key = name_key(domain);
        let scene_id = self
            .scenes
            .get(&scene_key)
            .map(|s| s.id)
            .ok_or_else(|| ApiError::SceneNotFound(scene.to_string()))?;
        if !self.domains.contains_key(&domain_key) {
            return Err(ApiError::DomainNotFound(domain.to_string()));
        }
        shape.validate()?;

        let id = VolumeId(self.next_volume_id);
        self.next_volume_id += 1;
        let zone_type = shape.zone_type();
        self.volumes.insert(
            id,
            Volume {
                id,
                domain: domain_key.clone(),
                scene: scene_id,
                shape,
            },
        );
        if let Some(domain) = self.domains.get_mut(&domain_key) {
            domain.attach(id);
        }
        let now = self.ctx.now();
        if let Some(scene) = self.scenes.get_mut(&scene_key) {
            scene.volumes.push(id);
            scene.updated_at = now;
        }
        debug!(scene, domain, volume_id = %id, zone_type = %zone_type, "Volume added");
        Ok(id)
    }

    pub fn remove_volume(&mut self, id: VolumeId) -> Result<Volume, ApiError> {
        let volume = self.volumes.remove(&id).ok_or(ApiError::VolumeNotFound(id))?;
        if let Some(domain) = self.domains.get_mut(&volume.domain) {
            domain.detach(id);
        }
        let now = self.ctx.now();
        if let Some(scene) = self
            .scene_keys
            .get(&volume.scene)
            .and_then(|key| self.scenes.get_mut(key))
        {
            scene.volumes.retain(|v| *v != id);
            scene.updated_at = now;
        }
        debug!(volume_id = %id, domain = %volume.domain, "Volume removed");
        Ok(volume)
    }

    /// Move a volume to `domain` with new bounds in one step.
    pub fn update_volume(&mut self, id: VolumeId, domain: &str, shape: Shape) -> Result<(), ApiError> {
        shape.validate()?;
        let new_domain = name_key(domain);
        if !self.domains.contains_key(&new_domain) {
            return Err(ApiError::DomainNotFound(domain.to_string()));
        }
        let volume = self.volumes.get_mut(&id).ok_or(ApiError::VolumeNotFound(id))?;

        if volume.domain != new_domain {
            if let Some(old) = self.domains.get_mut(&volume.domain) {
                old.detach(id);
            }
            if let Some(new) = self.domains.get_mut(&new_domain) {
                new.attach(id);
            }
            volume.domain = new_domain;
        }
        volume.shape = shape;
        let scene_id = volume.scene;

        let now = self.ctx.now();
        if let Some(scene) = self
            .scene_keys
            .get(&scene_id)
            .and_then(|key| self.scenes.get_mut(key))
        {
            scene.updated_at = now;
        }
        debug!(volume_id = %id, domain, "Volume updated");
        Ok(())
    }

    pub fn volume(&self, id: VolumeId) -> Result<&Volume, ApiError> {
        self.volumes.get(&id).ok_or(ApiError::VolumeNotFound(id))
    }

    // Assignments

    fn lookup_key(&self, key_id: &str) -> Result<Arc<SettingKey>, ApiError> {
        self.keys.get(key_id).map(Arc::clone)
    }

    fn settings_mut(&mut self, host: &str, key: &SettingKey) -> Result<&mut SettingAssignments, ApiError> {
        if self.is_global_name(host) {
            return Ok(&mut self.global.settings);
        }
        if key.is_global() {
            return Err(ApiError::InvalidArgument(format!(
                "Setting {} can only be assigned on the global host",
                key.id()
            )));
        }
        self.scenes
            .get_mut(&name_key(host))
            .map(|scene| &mut scene.settings)
            .ok_or_else(|| ApiError::HostNotFound(host.to_string()))
    }

    fn touch(&mut self, host: &str) {
        let now = self.ctx.now();
        if let Some(scene) = self.scenes.get_mut(&name_key(host)) {
            scene.updated_at = now;
        }
    }

    /// Assign a value, returning the replaced one.
    pub fn set_value(
        &mut self,
        host: &str,
        key_id: &str,
        value: SettingValue,
    ) -> Result<Option<SettingValue>, ApiError> {
        let key = self.lookup_key(key_id)?;
        key.check_value(&value)?;
        let previous = self.settings_mut(host, &key)?.set_value(key.id(), value);
        self.touch(host);
        debug!(host, key = key.id(), replaced = previous.is_some(), "Setting value assigned");
        Ok(previous)
    }

    /// Remove a value. Returns `None` and changes nothing when no value was
    /// assigned.
    pub fn unset_value(&mut self, host: &str, key_id: &str) -> Result<Option<SettingValue>, ApiError> {
        let key = self.lookup_key(key_id)?;
        let previous = self.settings_mut(host, &key)?.unset_value(key.id());
        if previous.is_some() {
            self.touch(host);
            debug!(host, key = key.id(), "Setting value removed");
        }
        Ok(previous)
    }

    pub fn set_target(
        &mut self,
        host: &str,
        key_id: &str,
        target: Target,
    ) -> Result<Option<Target>, ApiError> {
        let key = self.lookup_key(key_id)?;
        let previous = self.settings_mut(host, &key)?.set_target(key.id(), target);
        self.touch(host);
        debug!(host, key = key.id(), "Target assigned");
        Ok(previous)
    }

    pub fn remove_target(&mut self, host: &str, key_id: &str) -> Result<Option<Target>, ApiError> {
        let key = self.lookup_key(key_id)?;
        let previous = self.settings_mut(host, &key)?.remove_target(key.id());
        if previous.is_some() {
            self.touch(host);
            debug!(host, key = key.id(), "Target removed");
        }
        Ok(previous)
    }

    /// Edit an existing target in place.
    pub fn edit_target<R>(
        &mut self,
        host: &str,
        key_id: &str,
        edit: impl FnOnce(&mut Target) -> R,
    ) -> Result<R, ApiError> {
        let key = self.lookup_key(key_id)?;
        let target = self
            .settings_mut(host, &key)?
            .target_mut(key.id())
            .ok_or_else(|| {
                ApiError::InvalidArgument(format!(
                    "No target is assigned for {} on {}",
                    key.id(),
                    host
                ))
            })?;
        let result = edit(target);
        self.touch(host);
        debug!(host, key = key.id(), "Target edited");
        Ok(result)
    }

    // Resolution

    /// The global host plus every scene with a volume containing `point`,
    /// in resolution order.
    pub fn find_containing_hosts(&self, point: &Point) -> Result<Vec<&dyn Host>, ApiError> {
        let domain = self
            .domains
            .get(&name_key(&point.domain))
            .ok_or_else(|| ApiError::DomainNotFound(point.domain.clone()))?;

        let mut hosts: Vec<&dyn Host> = vec![&self.global];
        let mut seen = HashSet::new();
        for volume in domain.containing(&self.volumes, point.x, point.y, point.z) {
            if !seen.insert(volume.scene) {
                continue;
            }
            if let Some(scene) = self
                .scene_keys
                .get(&volume.scene)
                .and_then(|key| self.scenes.get(key))
            {
                hosts.push(scene);
            }
        }
        order_hosts(&mut hosts);
        Ok(hosts)
    }

    pub fn resolve(
        &self,
        key_id: &str,
        actor: Option<&ActorId>,
        point: &Point,
    ) -> Result<Evaluation, ApiError> {
        let key = self.keys.get(key_id)?;
        let hosts = self.find_containing_hosts(point)?;
        Ok(evaluate(key, &hosts, actor, &self.ctx))
    }

    /// Resolve a unary key straight into its Rust type.
    pub fn evaluate_as<T: SettingData>(
        &self,
        handle: UnaryKey<T>,
        actor: Option<&ActorId>,
        point: &Point,
    ) -> Result<T, ApiError> {
        let key = self.keys.unary(handle)?;
        let hosts = self.find_containing_hosts(point)?;
        let evaluation = evaluate(key, &hosts, actor, &self.ctx);
        T::from_datum(&evaluation.value).ok_or_else(|| ApiError::KeyMismatch {
            key: handle.id().to_string(),
            expected: std::any::type_name::<T>(),
        })
    }

    pub fn resolve_set(
        &self,
        handle: PolyKey,
        actor: Option<&ActorId>,
        point: &Point,
    ) -> Result<AltSet, ApiError> {
        let key = self.keys.poly(handle)?;
        let hosts = self.find_containing_hosts(point)?;
        let evaluation = evaluate(key, &hosts, actor, &self.ctx);
        evaluation
            .value
            .as_set()
            .cloned()
            .ok_or_else(|| ApiError::KeyMismatch {
                key: handle.id().to_string(),
                expected: "multiple value",
            })
    }

    /// Hosts at `point` whose assignment for the key changes nothing.
    pub fn redundant_hosts(
        &self,
        key_id: &str,
        actor: Option<&ActorId>,
        point: &Point,
    ) -> Result<Vec<String>, ApiError> {
        Ok(self.resolve(key_id, actor, point)?.redundant_hosts())
    }

    // Editing by handle

    pub fn edit_scene(&mut self, handle: SceneHandle) -> Result<SceneEditor<'_>, ApiError> {
        self.scene_key_for(handle.id())?;
        Ok(SceneEditor {
            system: self,
            id: handle.id(),
        })
    }

    // Persistence

    pub fn snapshot(&self) -> SystemSnapshot {
        let mut scenes: Vec<&Scene> = self.scenes.values().collect();
        scenes.sort_by_key(|scene| name_key(&scene.name));

        SystemSnapshot {
            global: GlobalRecord {
                settings: assignment_records(&self.global.settings),
            },
            domains: self.domains.values().map(|d| d.name().to_string()).collect(),
            scenes: scenes
                .into_iter()
                .map(|scene| SceneRecord {
                    name: scene.name.clone(),
                    priority: scene.priority,
                    volumes: scene
                        .volumes
                        .iter()
                        .filter_map(|id| self.volumes.get(id))
                        .map(|v| VolumeRecord {
                            domain: v.domain.clone(),
                            shape: v.shape.clone(),
                        })
                        .collect(),
                    settings: assignment_records(&scene.settings),
                    created_at: scene.created_at,
                    updated_at: scene.updated_at,
                })
                .collect(),
        }
    }

    /// Replace the registry contents with a snapshot.
    ///
    /// Every record is validated against a staged registry first; on error
    /// the current contents are left untouched. Handles taken before a
    /// successful restore expire.
    pub fn restore(&mut self, snapshot: SystemSnapshot) -> Result<(), ApiError> {
        let mut staged =
            HostSystem::with_config(Arc::clone(&self.keys), self.ctx.clone(), self.config.clone());
        staged.next_scene_id = self.next_scene_id;
        staged.next_volume_id = self.next_volume_id;

        for domain in &snapshot.domains {
            staged.register_domain(domain)?;
        }
        let global_name = staged.config.global_name.clone();
        staged.restore_assignments(&global_name, snapshot.global.settings)?;

        for record in snapshot.scenes {
            staged.create_scene(&record.name, record.priority)?;
            for volume in record.volumes {
                staged.add_volume(&record.name, &volume.domain, volume.shape)?;
            }
            staged.restore_assignments(&record.name, record.settings)?;
            if let Some(scene) = staged.scenes.get_mut(&name_key(&record.name)) {
                scene.created_at = record.created_at;
                scene.updated_at = record.updated_at;
            }
        }

        staged.retired = std::mem::take(&mut self.retired);
        for (id, key) in self.scene_keys.drain() {
            let name = self.scenes.get(&key).map_or(key.clone(), |s| s.name.clone());
            staged.retired.insert(id, name);
        }
        debug!(
            scenes = staged.scenes.len(),
            volumes = staged.volumes.len(),
            "Registry restored"
        );
        *self = staged;
        Ok(())
    }

    fn restore_assignments(&mut self, host: &str, records: Vec<AssignmentRecord>) -> Result<(), ApiError> {
        for record in records {
            if let Some(value) = record.value {
                self.set_value(host, &record.key, value)?;
            }
            if let Some(target) = record.target {
                self.set_target(host, &record.key, target)?;
            }
        }
        Ok(())
    }
}

fn assignment_records(settings: &SettingAssignments) -> Vec<AssignmentRecord> {
    settings
        .iter()
        .map(|(key, Assignment { value, target })| AssignmentRecord {
            key: key.clone(),
            value: value.clone(),
            target: target.clone(),
        })
        .collect()
}

fn bounds_overlap(a: &[(&str, BoundingBox)], b: &[(&str, BoundingBox)]) -> bool {
    a.iter().any(|(domain_a, box_a)| {
        b.iter()
            .any(|(domain_b, box_b)| domain_a == domain_b && box_a.intersects(box_b))
    })
}

/// Mutations scoped to one scene object.
///
/// Every call first checks that the scene has not been renamed or destroyed
/// since the handle was taken. Renaming through the editor moves the editor
/// to the new scene object.
pub struct SceneEditor<'a> {
    system: &'a mut HostSystem,
    id: SceneId,
}

impl<'a> SceneEditor<'a> {
    pub fn handle(&self) -> SceneHandle {
        SceneHandle { id: self.id }
    }

    pub fn scene(&self) -> Result<&Scene, ApiError> {
        self.system.scene_by_handle(self.handle())
    }

    pub fn name(&self) -> Result<String, ApiError> {
        Ok(self.scene()?.name.clone())
    }

    pub fn rename(&mut self, new: &str) -> Result<SceneHandle, ApiError> {
        let current = self.name()?;
        let handle = self.system.rename_scene(&current, new)?;
        self.id = handle.id();
        Ok(handle)
    }

    pub fn set_priority(&mut self, priority: i32) -> Result<PriorityShift, ApiError> {
        let name = self.name()?;
        self.system.set_priority(&name, priority)
    }

    pub fn add_volume(&mut self, domain: &str, shape: Shape) -> Result<VolumeId, ApiError> {
        let name = self.name()?;
        self.system.add_volume(&name, domain, shape)
    }

    pub fn remove_volume(&mut self, id: VolumeId) -> Result<Volume, ApiError> {
        self.scene()?;
        match self.system.volumes.get(&id) {
            Some(volume) if volume.scene == self.id => self.system.remove_volume(id),
            _ => Err(ApiError::VolumeNotFound(id)),
        }
    }

    /// Zone types of the scene's volumes, in insertion order.
    pub fn zone_types(&self) -> Result<Vec<ZoneType>, ApiError> {
        let scene = self.scene()?;
        Ok(scene
            .volumes
            .iter()
            .filter_map(|id| self.system.volumes.get(id))
            .map(Volume::zone_type)
            .collect())
    }

    pub fn set_value(&mut self, key_id: &str, value: SettingValue) -> Result<Option<SettingValue>, ApiError> {
        let name = self.name()?;
        self.system.set_value(&name, key_id, value)
    }

    pub fn unset_value(&mut self, key_id: &str) -> Result<Option<SettingValue>, ApiError> {
        let name = self.name()?;
        self.system.unset_value(&name, key_id)
    }

    pub fn set_target(&mut self, key_id: &str, target: Target) -> Result<Option<Target>, ApiError> {
        let name = self.name()?;
        self.system.set_target(&name, key_id, target)
    }

    pub fn remove_target(&mut self, key_id: &str) -> Result<Option<Target>, ApiError> {
        let name = self.name()?;
        self.system.remove_target(&name, key_id)
    }

    pub fn destroy(self) -> Result<Scene, ApiError> {
        let name = self.name()?;
        self.system.destroy_scene(&name)
    }
}
