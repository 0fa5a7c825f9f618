//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::DomainNotFound(name) => format!(
            "{} (register it with `warden domain add {}`)",
            e, name
        ),
        ApiError::SettingKeyNotFound(_) => format!("{} (see `warden keys`)", e),
        _ => e.to_string(),
    }
}
