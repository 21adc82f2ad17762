//! Core error types for cadence-core.
//!
//! The taxonomy is narrow: the scheduling core does no I/O of its own, so
//! most failures are input validation. Storage and configuration errors come
//! from the persistence collaborators that live alongside it.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for cadence-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Input rejected before it reached the log
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Snapshot storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors raised at the API boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Completion timestamp lies further in the future than the allowed skew
    #[error("Completion time {at} is more than {max_skew_minutes} minutes in the future")]
    FutureTimestamp {
        at: chrono::DateTime<chrono::FixedOffset>,
        max_skew_minutes: u32,
    },

    /// Category tag outside the known set
    #[error("Unknown task category: '{0}'")]
    UnknownCategory(String),

    /// Focus score outside [0, 1] or not a number
    #[error("Focus score must be within [0, 1], got {0}")]
    FocusScoreOutOfRange(f64),

    /// Hour bucket outside 0-23
    #[error("Hour must be within 0-23, got {0}")]
    HourOutOfRange(u32),

    /// Unparseable time-of-day or timestamp text
    #[error("Invalid time '{input}': {message}")]
    InvalidTime { input: String, message: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Snapshot storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Snapshot file could not be read or written
    #[error("Snapshot file {path}: {message}")]
    File { path: PathBuf, message: String },

    /// Snapshot contents violate log invariants
    #[error("Corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Storage(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
