//! Invertible string sets.
//!
//! An `AltSet` stores either the members it contains or, when inverted, the
//! members it excludes. This lets a poly setting express "everything except
//! chests" without enumerating every possible element.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AltSet {
    members: BTreeSet<String>,
    inverted: bool,
}

impl AltSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The set containing every element.
    pub fn full() -> Self {
        Self {
            members: BTreeSet::new(),
            inverted: true,
        }
    }

    pub fn of<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            members: items.into_iter().map(Into::into).collect(),
            inverted: false,
        }
    }

    /// Everything except the given items.
    pub fn all_except<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            members: items.into_iter().map(Into::into).collect(),
            inverted: true,
        }
    }

    pub fn contains(&self, item: &str) -> bool {
        self.members.contains(item) != self.inverted
    }

    pub fn is_empty(&self) -> bool {
        !self.inverted && self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.inverted && self.members.is_empty()
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Listed members: the contents, or the exclusions when inverted.
    pub fn members(&self) -> &BTreeSet<String> {
        &self.members
    }

    pub fn insert(&mut self, item: impl Into<String>) {
        let item = item.into();
        if self.inverted {
            self.members.remove(&item);
        } else {
            self.members.insert(item);
        }
    }

    pub fn remove(&mut self, item: &str) {
        if self.inverted {
            self.members.insert(item.to_string());
        } else {
            self.members.remove(item);
        }
    }

    pub fn invert(&mut self) {
        self.inverted = !self.inverted;
    }

    pub fn union(&self, other: &AltSet) -> AltSet {
        match (self.inverted, other.inverted) {
            (false, false) => AltSet {
                members: self.members.union(&other.members).cloned().collect(),
                inverted: false,
            },
            (false, true) => AltSet {
                members: other.members.difference(&self.members).cloned().collect(),
                inverted: true,
            },
            (true, false) => AltSet {
                members: self.members.difference(&other.members).cloned().collect(),
                inverted: true,
            },
            (true, true) => AltSet {
                members: self.members.intersection(&other.members).cloned().collect(),
                inverted: true,
            },
        }
    }

    pub fn difference(&self, other: &AltSet) -> AltSet {
        match (self.inverted, other.inverted) {
            (false, false) => AltSet {
                members: self.members.difference(&other.members).cloned().collect(),
                inverted: false,
            },
            (false, true) => AltSet {
                members: self.members.intersection(&other.members).cloned().collect(),
                inverted: false,
            },
            (true, false) => AltSet {
                members: self.members.union(&other.members).cloned().collect(),
                inverted: true,
            },
            (true, true) => AltSet {
                members: other.members.difference(&self.members).cloned().collect(),
                inverted: false,
            },
        }
    }
}

impl<S: Into<String>> FromIterator<S> for AltSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        AltSet::of(iter)
    }
}
