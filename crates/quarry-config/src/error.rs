//! Error types for configuration loading

use std::path::PathBuf;
use thiserror::Error;

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path to the file
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Config file could not be parsed
    #[error("Failed to parse {format} config: {message}")]
    Parse {
        /// Format the content was parsed as
        format: &'static str,
        /// Parser message
        message: String,
    },

    /// File extension maps to no known (or no enabled) format
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// A field failed validation
    #[error("Invalid value for {field}: {value}")]
    InvalidValue {
        /// Dotted path of the field
        field: String,
        /// Why the value was rejected
        value: String,
    },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
