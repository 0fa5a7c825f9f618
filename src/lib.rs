//! Warden: Zone Protection Setting Resolution
//!
//! Scenes are named, prioritized sets of volumes inside a domain. Each scene
//! and the universal global host assign values to typed setting keys. Given a
//! key, a point and an optional actor, the registry finds every host
//! containing the point and resolves the effective value by priority, with
//! per-assignment targets deciding which actors an assignment applies to.

pub mod cli;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod evaluate;
pub mod geometry;
pub mod host;
pub mod logging;
pub mod service;
pub mod setting;
pub mod store;
pub mod system;
pub mod types;

pub use context::{CapabilityCheck, EngineContext};
pub use error::ApiError;
pub use evaluate::{Evaluation, TraceEntry};
pub use geometry::Shape;
pub use host::{Global, Host, Scene, SceneHandle};
pub use service::Warden;
pub use setting::{AltSet, Datum, SettingKey, SettingKeyRegistry, SettingValue, Target};
pub use system::{HostSystem, PriorityShift, SceneEditor};
pub use types::{ActorId, Point, SceneId, VolumeId};
