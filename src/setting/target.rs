//! Actor eligibility filters attached to a setting assignment.

use crate::context::{AnonymousPolicy, EngineContext};
use crate::types::ActorId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    All,
    None,
    Whitelist(BTreeSet<ActorId>),
    Blacklist(BTreeSet<ActorId>),
}

/// Decides whether an assignment affects a given actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub kind: TargetKind,
    /// Capability string -> required outcome for actors holding it.
    pub permissions: BTreeMap<String, bool>,
    /// When set, the unrestricted capability grants no bypass.
    pub force_affect: bool,
}

impl Target {
    fn with_kind(kind: TargetKind) -> Self {
        Self {
            kind,
            permissions: BTreeMap::new(),
            force_affect: false,
        }
    }

    pub fn all() -> Self {
        Self::with_kind(TargetKind::All)
    }

    pub fn none() -> Self {
        Self::with_kind(TargetKind::None)
    }

    pub fn whitelist<I: IntoIterator<Item = ActorId>>(actors: I) -> Self {
        Self::with_kind(TargetKind::Whitelist(actors.into_iter().collect()))
    }

    pub fn blacklist<I: IntoIterator<Item = ActorId>>(actors: I) -> Self {
        Self::with_kind(TargetKind::Blacklist(actors.into_iter().collect()))
    }

    pub fn with_permission(mut self, capability: impl Into<String>, required: bool) -> Self {
        self.permissions.insert(capability.into(), required);
        self
    }

    pub fn forced(mut self) -> Self {
        self.force_affect = true;
        self
    }

    /// Add an actor to the list. A match-all or match-none target becomes a
    /// whitelist holding only this actor. Returns false if nothing changed.
    pub fn add_actor(&mut self, actor: ActorId) -> bool {
        match &mut self.kind {
            TargetKind::Whitelist(list) | TargetKind::Blacklist(list) => list.insert(actor),
            TargetKind::All | TargetKind::None => {
                self.kind = TargetKind::Whitelist(BTreeSet::from([actor]));
                true
            }
        }
    }

    pub fn remove_actor(&mut self, actor: &ActorId) -> bool {
        match &mut self.kind {
            TargetKind::Whitelist(list) | TargetKind::Blacklist(list) => list.remove(actor),
            TargetKind::All | TargetKind::None => false,
        }
    }

    /// Whether the assignment carrying this target applies to `actor`.
    pub fn test(&self, actor: Option<&ActorId>, player_restrictive: bool, ctx: &EngineContext) -> bool {
        let actor = match actor {
            Some(actor) => actor,
            None => {
                return match &self.kind {
                    TargetKind::All => true,
                    TargetKind::None | TargetKind::Whitelist(_) => false,
                    TargetKind::Blacklist(_) => {
                        ctx.anonymous_policy() == AnonymousPolicy::TreatAsUnlisted
                    }
                }
            }
        };

        if !self.force_affect
            && player_restrictive
            && ctx.has_capability(actor, ctx.unrestricted_capability())
        {
            return true;
        }

        let listed = match &self.kind {
            TargetKind::All => true,
            TargetKind::None => false,
            TargetKind::Whitelist(list) => list.contains(actor),
            TargetKind::Blacklist(list) => !list.contains(actor),
        };

        let mut granted = false;
        for (capability, required) in &self.permissions {
            if ctx.has_capability(actor, capability) {
                if !required {
                    return false;
                }
                granted = true;
            }
        }
        granted || listed
    }
}

impl Default for Target {
    fn default() -> Self {
        Self::all()
    }
}
