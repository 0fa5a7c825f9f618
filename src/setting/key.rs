//! Setting key definitions.
//!
//! A [`SettingKey`] is a tagged definition: the [`KeyDefinition`] payload
//! carries the codec and default data for either shape, and the surrounding
//! struct carries metadata shared by both. Keys are built with
//! [`SettingKeyBuilder`] and never change after registration.

use crate::error::ApiError;
use crate::setting::alt_set::AltSet;
use crate::setting::codec::{StringSetCodec, ValueCodec};
use crate::setting::datum::{Datum, SettingData};
use crate::setting::value::{PolyValue, SettingValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Blocks,
    Damage,
    Entities,
    Misc,
    Movement,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Blocks => "blocks",
            Category::Damage => "damage",
            Category::Entities => "entities",
            Category::Misc => "misc",
            Category::Movement => "movement",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyShape {
    Unary,
    Poly,
}

impl fmt::Display for KeyShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyShape::Unary => f.write_str("unary"),
            KeyShape::Poly => f.write_str("poly"),
        }
    }
}

/// How text input for a poly key combines with lower layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolyEdit {
    /// Replace the lower result.
    #[default]
    Declare,
    Add,
    Subtract,
}

/// Shape-specific payload of a key.
#[derive(Debug, Clone)]
pub enum KeyDefinition {
    Unary {
        codec: Arc<dyn ValueCodec>,
        default: Datum,
        /// Value the game exhibits when nothing is configured.
        natural: Datum,
    },
    Poly {
        codec: Arc<StringSetCodec>,
        default: AltSet,
        natural: AltSet,
    },
}

#[derive(Debug, Clone)]
pub struct SettingKey {
    id: String,
    definition: KeyDefinition,
    description: Option<String>,
    blurb: Option<String>,
    category: Category,
    global: bool,
    player_restrictive: bool,
    functional: bool,
}

impl SettingKey {
    pub fn unary(
        id: impl Into<String>,
        default: Datum,
        codec: impl ValueCodec + 'static,
    ) -> SettingKeyBuilder {
        SettingKeyBuilder::new(
            id.into(),
            KeyDefinition::Unary {
                codec: Arc::new(codec),
                natural: default.clone(),
                default,
            },
        )
    }

    pub fn poly(id: impl Into<String>, default: AltSet, codec: StringSetCodec) -> SettingKeyBuilder {
        SettingKeyBuilder::new(
            id.into(),
            KeyDefinition::Poly {
                codec: Arc::new(codec),
                natural: default.clone(),
                default,
            },
        )
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn definition(&self) -> &KeyDefinition {
        &self.definition
    }

    pub fn shape(&self) -> KeyShape {
        match self.definition {
            KeyDefinition::Unary { .. } => KeyShape::Unary,
            KeyDefinition::Poly { .. } => KeyShape::Poly,
        }
    }

    pub fn codec(&self) -> &dyn ValueCodec {
        match &self.definition {
            KeyDefinition::Unary { codec, .. } => codec.as_ref(),
            KeyDefinition::Poly { codec, .. } => codec.as_ref(),
        }
    }

    pub fn default_datum(&self) -> Datum {
        match &self.definition {
            KeyDefinition::Unary { default, .. } => default.clone(),
            KeyDefinition::Poly { default, .. } => Datum::Set(default.clone()),
        }
    }

    pub fn natural_datum(&self) -> Datum {
        match &self.definition {
            KeyDefinition::Unary { natural, .. } => natural.clone(),
            KeyDefinition::Poly { natural, .. } => Datum::Set(natural.clone()),
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn blurb(&self) -> Option<&str> {
        self.blurb.as_deref()
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Assignable only on the global host.
    pub fn is_global(&self) -> bool {
        self.global
    }

    /// Restricts what actors may do, so the unrestricted capability bypasses it.
    pub fn is_player_restrictive(&self) -> bool {
        self.player_restrictive
    }

    pub fn is_functional(&self) -> bool {
        self.functional
    }

    /// Verify that `value` has this key's shape and passes its codec.
    pub fn check_value(&self, value: &SettingValue) -> Result<(), ApiError> {
        let accepted = match (&self.definition, value) {
            (KeyDefinition::Unary { codec, .. }, SettingValue::Unary(datum)) => {
                codec.accepts(datum)
            }
            (KeyDefinition::Poly { codec, .. }, SettingValue::Poly(poly)) => match poly {
                PolyValue::Declarative(set) => codec.accepts(&Datum::Set(set.clone())),
                PolyValue::Manipulative {
                    additive,
                    subtractive,
                } => {
                    codec.accepts(&Datum::Set(additive.clone()))
                        && codec.accepts(&Datum::Set(subtractive.clone()))
                }
            },
            _ => {
                return Err(ApiError::KeyMismatch {
                    key: self.id.clone(),
                    expected: self.shape_name(),
                })
            }
        };
        if accepted {
            Ok(())
        } else {
            Err(ApiError::InvalidArgument(format!(
                "Value is not a valid {} for setting {}",
                self.codec().type_name(),
                self.id
            )))
        }
    }

    /// Parse user input into a value for this key.
    pub fn parse_value(&self, input: &str, edit: PolyEdit) -> Result<SettingValue, ApiError> {
        match &self.definition {
            KeyDefinition::Unary { codec, .. } => {
                if edit != PolyEdit::Declare {
                    return Err(ApiError::KeyMismatch {
                        key: self.id.clone(),
                        expected: self.shape_name(),
                    });
                }
                Ok(SettingValue::Unary(codec.decode(input)?))
            }
            KeyDefinition::Poly { codec, .. } => {
                let set = codec.decode_set(input)?;
                Ok(SettingValue::Poly(match edit {
                    PolyEdit::Declare => PolyValue::Declarative(set),
                    PolyEdit::Add => PolyValue::additive(set),
                    PolyEdit::Subtract => PolyValue::subtractive(set),
                }))
            }
        }
    }

    pub fn print_datum(&self, datum: &Datum) -> String {
        self.codec().encode(datum)
    }

    pub fn print_value(&self, value: &SettingValue) -> String {
        self.codec().encode_value(value)
    }

    fn shape_name(&self) -> &'static str {
        match self.shape() {
            KeyShape::Unary => "single value",
            KeyShape::Poly => "multiple value",
        }
    }
}

pub struct SettingKeyBuilder {
    key: SettingKey,
}

impl SettingKeyBuilder {
    fn new(id: String, definition: KeyDefinition) -> Self {
        Self {
            key: SettingKey {
                id,
                definition,
                description: None,
                blurb: None,
                category: Category::Misc,
                global: false,
                player_restrictive: false,
                functional: true,
            },
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.key.description = Some(description.into());
        self
    }

    pub fn blurb(mut self, blurb: impl Into<String>) -> Self {
        self.key.blurb = Some(blurb.into());
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.key.category = category;
        self
    }

    pub fn global(mut self) -> Self {
        self.key.global = true;
        self
    }

    pub fn player_restrictive(mut self) -> Self {
        self.key.player_restrictive = true;
        self
    }

    pub fn functional(mut self, functional: bool) -> Self {
        self.key.functional = functional;
        self
    }

    /// Unary natural value. Ignored for poly keys.
    pub fn natural(mut self, datum: Datum) -> Self {
        if let KeyDefinition::Unary { natural, .. } = &mut self.key.definition {
            *natural = datum;
        }
        self
    }

    /// Poly natural set. Ignored for unary keys.
    pub fn natural_set(mut self, set: AltSet) -> Self {
        if let KeyDefinition::Poly { natural, .. } = &mut self.key.definition {
            *natural = set;
        }
        self
    }

    pub fn build(self) -> Result<SettingKey, ApiError> {
        let key = self.key;
        if key.id.is_empty()
            || !key
                .id
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        {
            return Err(ApiError::InvalidArgument(format!(
                "Setting key id '{}' must be non-empty lowercase letters, digits, '-' or '_'",
                key.id
            )));
        }
        let codec = key.codec();
        for (label, datum) in [("default", key.default_datum()), ("natural", key.natural_datum())] {
            if !codec.accepts(&datum) {
                return Err(ApiError::InvalidArgument(format!(
                    "The {} value of setting {} is not a valid {}",
                    label,
                    key.id,
                    codec.type_name()
                )));
            }
        }
        Ok(key)
    }
}

/// Typed handle to a registered unary key.
pub struct UnaryKey<T> {
    id: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T: SettingData> UnaryKey<T> {
    pub const fn new(id: &'static str) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn value(&self, data: T) -> SettingValue {
        SettingValue::Unary(data.into_datum())
    }
}

impl<T> Clone for UnaryKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for UnaryKey<T> {}

impl<T> fmt::Debug for UnaryKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UnaryKey").field(&self.id).finish()
    }
}

/// Typed handle to a registered poly key.
#[derive(Debug, Clone, Copy)]
pub struct PolyKey {
    id: &'static str,
}

impl PolyKey {
    pub const fn new(id: &'static str) -> Self {
        Self { id }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }
}
