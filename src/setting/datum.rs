//! Resolved setting data.

use crate::setting::alt_set::AltSet;
use serde::{Deserialize, Serialize};

/// A single piece of setting data. Unary keys resolve to one of the scalar
/// variants, poly keys always resolve to [`Datum::Set`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Datum {
    Bool(bool),
    Int(i64),
    Text(String),
    MaybeText(Option<String>),
    Set(AltSet),
}

impl Datum {
    pub fn variant_name(&self) -> &'static str {
        match self {
            Datum::Bool(_) => "boolean",
            Datum::Int(_) => "integer",
            Datum::Text(_) => "text",
            Datum::MaybeText(_) => "optional text",
            Datum::Set(_) => "set",
        }
    }

    pub fn as_set(&self) -> Option<&AltSet> {
        match self {
            Datum::Set(set) => Some(set),
            _ => None,
        }
    }
}

/// Conversion between a Rust type and [`Datum`], used by typed key handles.
pub trait SettingData: Sized {
    fn into_datum(self) -> Datum;
    fn from_datum(datum: &Datum) -> Option<Self>;
}

impl SettingData for bool {
    fn into_datum(self) -> Datum {
        Datum::Bool(self)
    }

    fn from_datum(datum: &Datum) -> Option<Self> {
        match datum {
            Datum::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl SettingData for i64 {
    fn into_datum(self) -> Datum {
        Datum::Int(self)
    }

    fn from_datum(datum: &Datum) -> Option<Self> {
        match datum {
            Datum::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl SettingData for String {
    fn into_datum(self) -> Datum {
        Datum::Text(self)
    }

    fn from_datum(datum: &Datum) -> Option<Self> {
        match datum {
            Datum::Text(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl SettingData for Option<String> {
    fn into_datum(self) -> Datum {
        Datum::MaybeText(self)
    }

    fn from_datum(datum: &Datum) -> Option<Self> {
        match datum {
            Datum::MaybeText(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl SettingData for AltSet {
    fn into_datum(self) -> Datum {
        Datum::Set(self)
    }

    fn from_datum(datum: &Datum) -> Option<Self> {
        datum.as_set().cloned()
    }
}
