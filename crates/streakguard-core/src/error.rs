//! Core error types for streakguard-core.
//!
//! The ledger itself never fails: malformed date keys and missing history
//! degrade to no-op results. Errors only surface from operations that can
//! be refused (repair) or that touch the filesystem (config, ledger store).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for streakguard-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Ledger store errors
    #[error("Ledger store error: {0}")]
    Store(#[from] StoreError),

    /// Repair was refused
    #[error("Repair refused: {0}")]
    Repair(#[from] RepairError),
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

    /// Unknown dotted key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Ledger store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading the ledger snapshot failed
    #[error("Failed to read ledger at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the ledger snapshot failed
    #[error("Failed to write ledger at {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot on disk is not valid JSON for the current schema
    #[error("Corrupt ledger at {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Serializing the snapshot failed
    #[error("Failed to encode ledger: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Reasons a streak repair is refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepairError {
    /// No break is recorded (also returned for a second repair of the same break)
    #[error("streak is not broken")]
    NotBroken,

    /// The repair window has closed
    #[error("repair window closed at {deadline_ms}")]
    WindowExpired { deadline_ms: i64 },

    /// Not enough shields to pay for the repair
    #[error("repair needs {required} shields, only {available} available")]
    InsufficientShields { available: u32, required: u32 },
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Value must be strictly positive
    #[error("'{field}' must be greater than zero")]
    NotPositive { field: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
