//! Core error types for hydromate-core.
//!
//! This module defines the error hierarchy using thiserror. Pure
//! computation errors (a malformed reminder window, a zero goal) are
//! rejected where the value is constructed; storage and scheduling
//! failures carry enough context to be reported without crashing the
//! store.

use chrono::NaiveTime;
use thiserror::Error;

/// Core error type for hydromate-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Scheduling precondition failures
    #[error("Scheduling error: {0}")]
    Scheduling(#[from] SchedulingError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: std::path::PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Stored value could not be decoded
    #[error("Corrupt record for '{key}': {message}")]
    CorruptRecord { key: String, message: String },

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Scheduling errors.
///
/// Programming alarms without the platform permission is a caller bug:
/// the `canScheduleAlarms` flag must be checked first. It is signaled as
/// a precondition failure, never retried.
#[derive(Error, Debug)]
pub enum SchedulingError {
    /// Exact alarm permission is not granted
    #[error("cannot schedule exact reminders without permission")]
    PermissionDenied,
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid reminder window
    #[error("Invalid time range: end ({end}) must be after start ({start})")]
    InvalidTimeRange { start: NaiveTime, end: NaiveTime },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
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
