//! Core error types for questlog-core.
//!
//! Every engine in this crate is a local computation, so the hierarchy is
//! small: validation failures surface to the caller as [`ValidationError`],
//! balance-file problems as [`ConfigError`], and both roll up into
//! [`CoreError`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for questlog-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid caller input
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

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

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Config directory could not be determined or created
    #[error("Config directory unavailable: {0}")]
    DirectoryUnavailable(String),
}

/// Validation errors, the `InvalidInput` family.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Timestamp that does not parse to a valid instant
    #[error("Invalid timestamp for '{field}': {value:?}")]
    InvalidTimestamp { field: String, value: String },

    /// Calendar date that is not `YYYY-MM-DD`
    #[error("Invalid calendar date: {0:?}")]
    InvalidDate(String),

    /// Invalid time range
    #[error("Invalid time range: end_time ({end}) must be greater than start_time ({start})")]
    InvalidTimeRange {
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    },

    /// Negative (or NaN) XP where a non-negative amount is required
    #[error("XP must be non-negative, got {0}")]
    NegativeXp(f64),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Gate days must be numbered 1..=n without gaps
    #[error("Gate days must be 1-based and contiguous, found day {found} at position {position}")]
    InvalidGateDays { position: usize, found: u32 },

    /// Date after "today" where only past or present dates are accepted
    #[error("Date {date} is in the future (today is {today})")]
    FutureDate {
        date: chrono::NaiveDate,
        today: chrono::NaiveDate,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    pub(crate) fn invalid_value(field: &str, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
