//! Setting Model
//!
//! Typed configuration parameters that hosts assign and the resolution engine
//! evaluates. A [`SettingKey`] is registered once at startup through
//! [`SettingKeyRegistryBuilder`] and is immutable afterwards. Keys come in two
//! shapes: unary keys resolve to a single [`Datum`], poly keys resolve to an
//! [`AltSet`] composed from every eligible layer.

pub mod alt_set;
pub mod catalog;
pub mod codec;
pub mod datum;
pub mod key;
pub mod registry;
pub mod target;
pub mod value;

pub use alt_set::AltSet;
pub use codec::{BoolCodec, BoolStyle, IntCodec, OptionalTextCodec, StringSetCodec, TextCodec, ValueCodec};
pub use datum::{Datum, SettingData};
pub use key::{
    Category, KeyDefinition, KeyShape, PolyEdit, PolyKey, SettingKey, SettingKeyBuilder, UnaryKey,
};
pub use registry::{SettingKeyRegistry, SettingKeyRegistryBuilder};
pub use target::{Target, TargetKind};
pub use value::{PolyValue, SettingValue};
