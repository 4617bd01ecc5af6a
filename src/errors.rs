// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),

    #[error("error while executing script: {0}")]
    Execution(String),

    #[error("streaming error: {0}")]
    Streaming(String),

    #[error("export error: {0}")]
    Export(String),

    /// The run's cancellation scope fired before its batch could be flushed.
    #[error("execution cancelled")]
    Cancelled,

    /// An unexpected fault intercepted by the supervisor's crash barrier.
    #[error("unexpected fault: {0}")]
    Fault(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Why a single result row could not be turned into telemetry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("missing column '{column}'")]
    MissingColumn { column: String },

    #[error("unexpected type for column '{column}': expected {expected}, found {found}")]
    UnexpectedType {
        column: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("unusable value in column '{column}': {reason}")]
    Unusable { column: String, reason: String },
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, CollectorError>;
