//! Value Codecs
//!
//! A codec turns user-facing text into setting data and back, and decides
//! which data a key accepts. Every registered key carries exactly one codec;
//! composition of poly layers is not a codec concern and lives on
//! [`PolyValue`](crate::setting::PolyValue).

use crate::error::ApiError;
use crate::setting::alt_set::AltSet;
use crate::setting::datum::Datum;
use crate::setting::value::{PolyValue, SettingValue};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Parse, print and validate data for one kind of setting.
pub trait ValueCodec: Send + Sync + fmt::Debug {
    /// Human readable name of the accepted data, used in error messages.
    fn type_name(&self) -> &'static str;

    fn decode(&self, input: &str) -> Result<Datum, ApiError>;

    fn encode(&self, datum: &Datum) -> String;

    fn accepts(&self, datum: &Datum) -> bool;

    fn encode_value(&self, value: &SettingValue) -> String {
        match value {
            SettingValue::Unary(datum) => self.encode(datum),
            SettingValue::Poly(PolyValue::Declarative(set)) => self.encode(&Datum::Set(set.clone())),
            SettingValue::Poly(PolyValue::Manipulative {
                additive,
                subtractive,
            }) => format!(
                "add [{}], subtract [{}]",
                self.encode(&Datum::Set(additive.clone())),
                self.encode(&Datum::Set(subtractive.clone()))
            ),
        }
    }
}

/// Printed form of a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoolStyle {
    #[default]
    TrueFalse,
    OnOff,
    AllowDeny,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BoolCodec {
    pub style: BoolStyle,
}

impl BoolCodec {
    pub fn new(style: BoolStyle) -> Self {
        Self { style }
    }

    pub fn toggle() -> Self {
        Self::new(BoolStyle::OnOff)
    }
}

impl ValueCodec for BoolCodec {
    fn type_name(&self) -> &'static str {
        "boolean"
    }

    fn decode(&self, input: &str) -> Result<Datum, ApiError> {
        match input.trim().to_lowercase().as_str() {
            "true" | "allow" | "on" | "yes" => Ok(Datum::Bool(true)),
            "false" | "deny" | "off" | "no" => Ok(Datum::Bool(false)),
            other => Err(ApiError::InvalidArgument(format!(
                "'{}' is not a boolean. Allowed values: true, false, allow, deny, on, off, yes, no",
                other
            ))),
        }
    }

    fn encode(&self, datum: &Datum) -> String {
        match (datum, self.style) {
            (Datum::Bool(true), BoolStyle::TrueFalse) => "true".to_string(),
            (Datum::Bool(false), BoolStyle::TrueFalse) => "false".to_string(),
            (Datum::Bool(true), BoolStyle::OnOff) => "on".to_string(),
            (Datum::Bool(false), BoolStyle::OnOff) => "off".to_string(),
            (Datum::Bool(true), BoolStyle::AllowDeny) => "allow".to_string(),
            (Datum::Bool(false), BoolStyle::AllowDeny) => "deny".to_string(),
            (other, _) => format!("<{}>", other.variant_name()),
        }
    }

    fn accepts(&self, datum: &Datum) -> bool {
        matches!(datum, Datum::Bool(_))
    }
}

/// Integer codec with optional inclusive bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntCodec {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl IntCodec {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn range(min: i64, max: i64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn at_least(min: i64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    fn in_range(&self, value: i64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

impl ValueCodec for IntCodec {
    fn type_name(&self) -> &'static str {
        "integer"
    }

    fn decode(&self, input: &str) -> Result<Datum, ApiError> {
        let value: i64 = input.trim().parse().map_err(|_| {
            ApiError::InvalidArgument(format!("'{}' is not an integer", input.trim()))
        })?;
        if !self.in_range(value) {
            let min = self.min.map_or("-inf".to_string(), |m| m.to_string());
            let max = self.max.map_or("inf".to_string(), |m| m.to_string());
            return Err(ApiError::InvalidArgument(format!(
                "{} is outside the allowed range [{}, {}]",
                value, min, max
            )));
        }
        Ok(Datum::Int(value))
    }

    fn encode(&self, datum: &Datum) -> String {
        match datum {
            Datum::Int(value) => value.to_string(),
            other => format!("<{}>", other.variant_name()),
        }
    }

    fn accepts(&self, datum: &Datum) -> bool {
        matches!(datum, Datum::Int(value) if self.in_range(*value))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextCodec;

impl ValueCodec for TextCodec {
    fn type_name(&self) -> &'static str {
        "text"
    }

    fn decode(&self, input: &str) -> Result<Datum, ApiError> {
        Ok(Datum::Text(input.to_string()))
    }

    fn encode(&self, datum: &Datum) -> String {
        match datum {
            Datum::Text(text) => text.clone(),
            other => format!("<{}>", other.variant_name()),
        }
    }

    fn accepts(&self, datum: &Datum) -> bool {
        matches!(datum, Datum::Text(_))
    }
}

/// Text that may be absent. The empty string decodes to `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionalTextCodec;

impl ValueCodec for OptionalTextCodec {
    fn type_name(&self) -> &'static str {
        "optional text"
    }

    fn decode(&self, input: &str) -> Result<Datum, ApiError> {
        if input.is_empty() {
            Ok(Datum::MaybeText(None))
        } else {
            Ok(Datum::MaybeText(Some(input.to_string())))
        }
    }

    fn encode(&self, datum: &Datum) -> String {
        match datum {
            Datum::MaybeText(Some(text)) => text.clone(),
            Datum::MaybeText(None) => String::new(),
            other => format!("<{}>", other.variant_name()),
        }
    }

    fn accepts(&self, datum: &Datum) -> bool {
        matches!(datum, Datum::MaybeText(_))
    }
}

const ALL_EXCEPT_PREFIX: &str = "(all except)";

/// Set-of-strings codec for poly keys.
///
/// Elements are case-folded. Input is split on commas and whitespace; a token
/// naming a group expands to the group's members. `all` and `none` decode to
/// the full and empty sets, and a leading `(all except)` inverts the rest.
/// Printing collapses every fully contained group back to its name.
#[derive(Debug, Clone, Default)]
pub struct StringSetCodec {
    groups: BTreeMap<String, BTreeSet<String>>,
    options: Option<BTreeSet<String>>,
}

impl StringSetCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict accepted elements to `options`.
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(|o| o.into().to_lowercase()).collect());
        self
    }

    pub fn with_group<I, S>(mut self, name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.insert(
            name.into().to_lowercase(),
            members.into_iter().map(|m| m.into().to_lowercase()).collect(),
        );
        self
    }

    pub fn groups(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.groups
    }

    pub fn options(&self) -> Option<&BTreeSet<String>> {
        self.options.as_ref()
    }

    /// Parse a comma or whitespace separated list into a set.
    pub fn decode_set(&self, input: &str) -> Result<AltSet, ApiError> {
        let trimmed = input.trim();
        let lowered = trimmed.to_lowercase();
        match lowered.as_str() {
            "" | "none" => return Ok(AltSet::empty()),
            "all" => return Ok(AltSet::full()),
            _ => {}
        }

        let (inverted, body) = if let Some(rest) = lowered.strip_prefix(ALL_EXCEPT_PREFIX) {
            (true, rest)
        } else if let Some(rest) = lowered.strip_prefix("all except ") {
            (true, rest)
        } else {
            (false, lowered.as_str())
        };

        let mut members = BTreeSet::new();
        for token in body.split(|c: char| c == ',' || c.is_whitespace()) {
            if token.is_empty() {
                continue;
            }
            if let Some(group) = self.groups.get(token) {
                members.extend(group.iter().cloned());
                continue;
            }
            if let Some(options) = &self.options {
                if !options.contains(token) {
                    return Err(ApiError::InvalidArgument(self.invalid_element(token)));
                }
            }
            members.insert(token.to_string());
        }

        if inverted {
            Ok(AltSet::all_except(members))
        } else {
            Ok(AltSet::of(members))
        }
    }

    fn invalid_element(&self, token: &str) -> String {
        let mut message = format!("{} is not a valid element.", token);
        if let Some(options) = &self.options {
            let shown: Vec<&str> = options.iter().take(8).map(String::as_str).collect();
            message.push_str(" Allowed types: ");
            message.push_str(&shown.join(", "));
            if options.len() > shown.len() {
                message.push_str(" ...");
            }
        }
        message
    }

    /// Print a set, collapsing fully contained groups to their names.
    pub fn encode_set(&self, set: &AltSet) -> String {
        if set.is_empty() {
            return "none".to_string();
        }
        if set.is_full() {
            return "all".to_string();
        }

        let mut remaining = set.members().clone();
        let mut tokens = Vec::new();
        for (name, group) in &self.groups {
            if !group.is_empty() && group.is_subset(set.members()) {
                tokens.push(name.clone());
                for member in group {
                    remaining.remove(member);
                }
            }
        }
        tokens.extend(remaining);

        let body = tokens.join(", ");
        if set.is_inverted() {
            format!("{} {}", ALL_EXCEPT_PREFIX, body)
        } else {
            body
        }
    }
}

impl ValueCodec for StringSetCodec {
    fn type_name(&self) -> &'static str {
        "set"
    }

    fn decode(&self, input: &str) -> Result<Datum, ApiError> {
        self.decode_set(input).map(Datum::Set)
    }

    fn encode(&self, datum: &Datum) -> String {
        match datum {
            Datum::Set(set) => self.encode_set(set),
            other => format!("<{}>", other.variant_name()),
        }
    }

    fn accepts(&self, datum: &Datum) -> bool {
        match (datum, &self.options) {
            (Datum::Set(set), Some(options)) => set.members().is_subset(options),
            (Datum::Set(_), None) => true,
            _ => false,
        }
    }
}
