//! Resolution Engine
//!
//! Computes the effective value of one key from the hosts containing a point.
//! Hosts are walked from highest to lowest priority while a pending target
//! filters which assignments apply to the actor. Unary keys stop at the first
//! eligible value; poly keys collect every eligible layer and compose them
//! from the lowest priority upwards, starting at the key's default set.

use crate::context::EngineContext;
use crate::host::Host;
use crate::setting::{AltSet, Datum, KeyShape, PolyValue, SettingKey, SettingValue, Target};
use crate::types::{name_key, ActorId};
use serde::Serialize;
use std::cmp::Ordering;
use tracing::trace;

/// One host's contribution to an evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    pub host: String,
    /// The host's value for unary keys, the cumulative set for poly keys.
    pub value: Datum,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Layer {
    host: String,
    value: PolyValue,
}

/// Result of resolving one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub key: String,
    pub value: Datum,
    /// Lowest priority first for poly keys; a single entry or nothing for
    /// unary keys.
    pub trace: Vec<TraceEntry>,
    default: Datum,
    layers: Vec<Layer>,
}

impl Evaluation {
    /// Whether no host contributed and the default was returned.
    pub fn is_default(&self) -> bool {
        self.trace.is_empty()
    }

    /// Hosts whose layer could be removed without changing the result.
    pub fn redundant_hosts(&self) -> Vec<String> {
        if self.layers.is_empty() {
            return match self.trace.as_slice() {
                [only] if only.value == self.default => vec![only.host.clone()],
                _ => Vec::new(),
            };
        }

        let Some(default) = self.default.as_set() else {
            return Vec::new();
        };
        let Some(result) = self.value.as_set() else {
            return Vec::new();
        };
        (0..self.layers.len())
            .filter(|skip| {
                let without = self
                    .layers
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| i != skip)
                    .fold(default.clone(), |running, (_, layer)| {
                        layer.value.apply_to(&running)
                    });
                &without == result
            })
            .map(|i| self.layers[i].host.clone())
            .collect()
    }
}

/// Resolution order: descending priority, then ascending case-folded name.
/// The global host always sorts last.
pub fn compare_hosts(a: &dyn Host, b: &dyn Host) -> Ordering {
    a.is_global()
        .cmp(&b.is_global())
        .then_with(|| b.priority().cmp(&a.priority()))
        .then_with(|| name_key(a.name()).cmp(&name_key(b.name())))
}

pub fn order_hosts(hosts: &mut [&dyn Host]) {
    hosts.sort_by(|a, b| compare_hosts(*a, *b));
}

/// Resolve `key` over `hosts`, which may be given in any order.
pub fn evaluate(
    key: &SettingKey,
    hosts: &[&dyn Host],
    actor: Option<&ActorId>,
    ctx: &EngineContext,
) -> Evaluation {
    let mut ordered: Vec<&dyn Host> = hosts
        .iter()
        .copied()
        .filter(|host| host.settings().get(key.id()).is_some())
        .collect();
    order_hosts(&mut ordered);

    match key.shape() {
        KeyShape::Unary => evaluate_unary(key, &ordered, actor, ctx),
        KeyShape::Poly => evaluate_poly(key, &ordered, actor, ctx),
    }
}

fn eligible(
    pending: Option<&Target>,
    actor: Option<&ActorId>,
    key: &SettingKey,
    ctx: &EngineContext,
) -> bool {
    pending.map_or(true, |target| {
        target.test(actor, key.is_player_restrictive(), ctx)
    })
}

fn evaluate_unary(
    key: &SettingKey,
    ordered: &[&dyn Host],
    actor: Option<&ActorId>,
    ctx: &EngineContext,
) -> Evaluation {
    let mut pending: Option<&Target> = None;
    for host in ordered {
        let Some(assignment) = host.settings().get(key.id()) else {
            continue;
        };
        if pending.is_none() {
            pending = assignment.target.as_ref();
        }
        let Some(value) = &assignment.value else {
            continue;
        };
        if eligible(pending, actor, key, ctx) {
            if let SettingValue::Unary(datum) = value {
                trace!(key = key.id(), host = host.name(), "Unary value selected");
                return Evaluation {
                    key: key.id().to_string(),
                    value: datum.clone(),
                    trace: vec![TraceEntry {
                        host: host.name().to_string(),
                        value: datum.clone(),
                    }],
                    default: key.default_datum(),
                    layers: Vec::new(),
                };
            }
        }
        trace!(key = key.id(), host = host.name(), "Assignment rejected by target");
        pending = None;
    }

    let default = key.default_datum();
    Evaluation {
        key: key.id().to_string(),
        value: default.clone(),
        trace: Vec::new(),
        default,
        layers: Vec::new(),
    }
}

fn evaluate_poly(
    key: &SettingKey,
    ordered: &[&dyn Host],
    actor: Option<&ActorId>,
    ctx: &EngineContext,
) -> Evaluation {
    let mut stack: Vec<Layer> = Vec::new();
    let mut pending: Option<&Target> = None;
    for host in ordered {
        let Some(assignment) = host.settings().get(key.id()) else {
            continue;
        };
        if pending.is_none() {
            pending = assignment.target.as_ref();
        }
        let Some(value) = &assignment.value else {
            continue;
        };
        if eligible(pending, actor, key, ctx) {
            if let SettingValue::Poly(poly) = value {
                trace!(key = key.id(), host = host.name(), "Poly layer collected");
                stack.push(Layer {
                    host: host.name().to_string(),
                    value: poly.clone(),
                });
            }
        } else {
            trace!(key = key.id(), host = host.name(), "Assignment rejected by target");
        }
        pending = None;
    }

    let default = key.default_datum();
    let mut running = default.as_set().cloned().unwrap_or_else(AltSet::empty);
    let mut trace = Vec::with_capacity(stack.len());
    stack.reverse();
    for layer in &stack {
        running = layer.value.apply_to(&running);
        trace.push(TraceEntry {
            host: layer.host.clone(),
            value: Datum::Set(running.clone()),
        });
    }

    Evaluation {
        key: key.id().to_string(),
        value: Datum::Set(running),
        trace,
        default,
        layers: stack,
    }
}
