//! Values stored on a host for one key.

use crate::setting::alt_set::AltSet;
use crate::setting::datum::Datum;
use serde::{Deserialize, Serialize};

/// How a poly layer combines with the lower-priority result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolyValue {
    /// Replace the running set wholesale.
    Declarative(AltSet),
    /// Add `additive`, then remove `subtractive`.
    Manipulative {
        additive: AltSet,
        subtractive: AltSet,
    },
}

impl PolyValue {
    pub fn additive(items: AltSet) -> Self {
        PolyValue::Manipulative {
            additive: items,
            subtractive: AltSet::empty(),
        }
    }

    pub fn subtractive(items: AltSet) -> Self {
        PolyValue::Manipulative {
            additive: AltSet::empty(),
            subtractive: items,
        }
    }

    pub fn is_declarative(&self) -> bool {
        matches!(self, PolyValue::Declarative(_))
    }

    pub fn apply_to(&self, running: &AltSet) -> AltSet {
        match self {
            PolyValue::Declarative(set) => set.clone(),
            PolyValue::Manipulative {
                additive,
                subtractive,
            } => running.union(additive).difference(subtractive),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettingValue {
    Unary(Datum),
    Poly(PolyValue),
}

impl SettingValue {
    pub fn shape_name(&self) -> &'static str {
        match self {
            SettingValue::Unary(_) => "single value",
            SettingValue::Poly(_) => "multiple value",
        }
    }
}

impl From<Datum> for SettingValue {
    fn from(datum: Datum) -> Self {
        SettingValue::Unary(datum)
    }
}

impl From<PolyValue> for SettingValue {
    fn from(value: PolyValue) -> Self {
        SettingValue::Poly(value)
    }
}
