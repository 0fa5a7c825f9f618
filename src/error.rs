//! Error types for the zone setting resolution system.

use crate::types::VolumeId;
use thiserror::Error;

/// Storage-related errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Corrupt stored state: {0}")]
    Corrupt(String),
}

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        StorageError::Database(err.to_string())
    }
}

/// Errors surfaced by registry, resolution and service operations
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Domain not found: {0}")]
    DomainNotFound(String),

    #[error("Scene not found: {0}")]
    SceneNotFound(String),

    #[error("Host not found: {0}")]
    HostNotFound(String),

    #[error("Setting key not found: {0}")]
    SettingKeyNotFound(String),

    #[error("Volume not found: {0}")]
    VolumeNotFound(VolumeId),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Setting {key} expects a {expected} value")]
    KeyMismatch { key: String, expected: &'static str },

    #[error("Host has expired and may no longer be used: {0}")]
    Expired(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// Coarse classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unknown domain, scene, host, volume or setting key.
    NotFound,
    /// Rejected before any mutation took place.
    InvalidArgument,
    /// Caller used a host that was destroyed or replaced.
    ConsistencyViolation,
    Storage,
    Config,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::DomainNotFound(_)
            | ApiError::SceneNotFound(_)
            | ApiError::HostNotFound(_)
            | ApiError::SettingKeyNotFound(_)
            | ApiError::VolumeNotFound(_) => ErrorKind::NotFound,
            ApiError::InvalidArgument(_) | ApiError::KeyMismatch { .. } => {
                ErrorKind::InvalidArgument
            }
            ApiError::Expired(_) => ErrorKind::ConsistencyViolation,
            ApiError::StorageError(_) => ErrorKind::Storage,
            ApiError::ConfigError(_) => ErrorKind::Config,
        }
    }
}
