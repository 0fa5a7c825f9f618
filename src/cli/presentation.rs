//! CLI presentation: text and json formatters per command family.

mod registry;
mod resolution;

pub use registry::{
    format_domains, format_keys_json, format_keys_text, format_priority_shift,
    format_scenes_json, format_scenes_text,
};
pub use resolution::{
    format_hosts_json, format_hosts_text, format_resolution_json, format_resolution_text,
};

use crate::error::{ApiError, StorageError};
use owo_colors::OwoColorize;

pub(crate) fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

pub(crate) fn to_json(value: &serde_json::Value) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::StorageError(StorageError::Encoding(e.to_string())))
}
