//! Engine Context
//!
//! Explicit collaborators handed to the registry and the resolution engine:
//! the capability check supplied by the embedding environment, a clock, and
//! the policies that shape target evaluation. Nothing here is process-global;
//! every `HostSystem` owns its own context.

use crate::config::ResolutionConfig;
use crate::types::ActorId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Privilege check owned by the embedding environment.
pub trait CapabilityCheck: Send + Sync {
    fn has_capability(&self, actor: &ActorId, capability: &str) -> bool;
}

impl<F> CapabilityCheck for F
where
    F: Fn(&ActorId, &str) -> bool + Send + Sync,
{
    fn has_capability(&self, actor: &ActorId, capability: &str) -> bool {
        self(actor, capability)
    }
}

/// Grants nothing to anyone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCapabilities;

impl CapabilityCheck for NoCapabilities {
    fn has_capability(&self, _actor: &ActorId, _capability: &str) -> bool {
        false
    }
}

/// Fixed grant table, for tools and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCapabilities {
    grants: HashMap<ActorId, HashSet<String>>,
}

impl StaticCapabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(mut self, actor: impl Into<ActorId>, capability: impl Into<String>) -> Self {
        self.grants
            .entry(actor.into())
            .or_default()
            .insert(capability.into());
        self
    }
}

impl CapabilityCheck for StaticCapabilities {
    fn has_capability(&self, actor: &ActorId, capability: &str) -> bool {
        self.grants
            .get(actor)
            .map(|caps| caps.contains(capability))
            .unwrap_or(false)
    }
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// How list targets treat lookups that carry no actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnonymousPolicy {
    /// Anonymous lookups fail every target except match-all.
    #[default]
    Reject,
    /// Anonymous lookups behave like an actor absent from every list.
    TreatAsUnlisted,
}

#[derive(Clone)]
pub struct EngineContext {
    capabilities: Arc<dyn CapabilityCheck>,
    clock: Arc<dyn Clock>,
    anonymous_policy: AnonymousPolicy,
    unrestricted_capability: String,
}

pub const DEFAULT_UNRESTRICTED_CAPABILITY: &str = "warden.unrestricted";

impl EngineContext {
    pub fn new(capabilities: Arc<dyn CapabilityCheck>) -> Self {
        Self {
            capabilities,
            clock: Arc::new(SystemClock),
            anonymous_policy: AnonymousPolicy::default(),
            unrestricted_capability: DEFAULT_UNRESTRICTED_CAPABILITY.to_string(),
        }
    }

    pub fn from_config(config: &ResolutionConfig, capabilities: Arc<dyn CapabilityCheck>) -> Self {
        Self::new(capabilities)
            .with_anonymous_policy(config.anonymous_policy)
            .with_unrestricted_capability(config.unrestricted_capability.clone())
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_anonymous_policy(mut self, policy: AnonymousPolicy) -> Self {
        self.anonymous_policy = policy;
        self
    }

    pub fn with_unrestricted_capability(mut self, capability: impl Into<String>) -> Self {
        self.unrestricted_capability = capability.into();
        self
    }

    pub fn has_capability(&self, actor: &ActorId, capability: &str) -> bool {
        self.capabilities.has_capability(actor, capability)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn anonymous_policy(&self) -> AnonymousPolicy {
        self.anonymous_policy
    }

    pub fn unrestricted_capability(&self) -> &str {
        &self.unrestricted_capability
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new(Arc::new(NoCapabilities))
    }
}

impl fmt::Debug for EngineContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineContext")
            .field("anonymous_policy", &self.anonymous_policy)
            .field("unrestricted_capability", &self.unrestricted_capability)
            .finish_non_exhaustive()
    }
}
