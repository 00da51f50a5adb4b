//! Error types for lf-core

use thiserror::Error;

/// Core error type for Lateflow
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// P001: Policy settings rejected at write time
    ///
    /// Raised for a threshold below 1, a missing mandatory field on an
    /// enabled policy, or an unrecognized mode/action/window label. A policy
    /// that fails here never becomes active.
    #[error("[P001] Invalid policy: {message}")]
    Configuration { message: String },

    /// A001: Malformed attendance input (unsorted or duplicate history,
    /// mixed employees, missing employee)
    #[error("[A001] Invalid attendance input: {message}")]
    InvalidInput { message: String },

    /// E014: IO error
    #[error("[E014] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E016: IO error with file path context
    #[error("[E016] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E015: YAML parse error
    #[error("[E015] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

impl CoreError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        CoreError::Configuration {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        CoreError::InvalidInput {
            message: message.into(),
        }
    }
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
