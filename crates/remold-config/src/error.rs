use std::io;

use remold_core::DecodeError;
use thiserror::Error;

/// Configuration error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file.
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to parse TOML.
    #[error("Failed to parse config file at {path}: {source}")]
    ParseError {
        /// Path to the file that failed to parse.
        path: String,
        /// Underlying TOML parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Failed to parse a JSON document.
    #[error("Failed to parse JSON document at {path}: {source}")]
    JsonError {
        /// Path to the document that failed to parse.
        path: String,
        /// Underlying JSON parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration validation failed.
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// Field that failed validation.
        field: String,
        /// Validation failure description.
        message: String,
    },

    /// A hook name does not match any built-in hook.
    #[error("Unknown decode hook '{name}'")]
    UnknownHook {
        /// The unrecognized name.
        name: String,
    },

    /// Decoding a document failed.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
