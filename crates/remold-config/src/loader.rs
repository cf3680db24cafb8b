//! Reading configuration and data files.

use std::path::Path;

use remold_core::{Decoder, Shape, Value};
use tracing::{debug, info};

use crate::document::{value_from_json, value_from_toml};
use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;
use crate::validate;

/// Maximum allowed file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// Load and validate a configuration file.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read, is too large,
/// cannot be parsed, or fails validation.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    let content = read_capped(path)?;
    let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        source: e,
    })?;
    validate::validate(&config)?;
    info!(path = %path.display(), "loaded decode config");
    Ok(config)
}

/// Parse and validate configuration from a TOML string.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the text cannot be parsed or fails
/// validation.
pub fn from_toml_str(content: &str) -> ConfigResult<Config> {
    let config: Config = toml::from_str(content).map_err(|e| ConfigError::ParseError {
        path: "<string>".to_owned(),
        source: e,
    })?;
    validate::validate(&config)?;
    Ok(config)
}

/// Load a data document as a [`Value`] tree.
///
/// Files ending in `.json` are read as JSON, everything else as TOML.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read, is too large, or
/// cannot be parsed.
pub fn load_document(path: &Path) -> ConfigResult<Value> {
    let content = read_capped(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let value = if is_json {
        let doc: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| ConfigError::JsonError {
                path: path.display().to_string(),
                source: e,
            })?;
        value_from_json(&doc)
    } else {
        let doc: toml::Value = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            source: e,
        })?;
        value_from_toml(&doc)
    };
    debug!(path = %path.display(), json = is_json, "loaded document");
    Ok(value)
}

/// Load a data document and decode it into `shape`.
///
/// # Errors
///
/// Returns a [`ConfigError`] if loading fails, or
/// [`ConfigError::Decode`] if decoding fails.
pub fn decode_file(path: &Path, shape: &Shape, decoder: &Decoder) -> ConfigResult<Value> {
    let document = load_document(path)?;
    Ok(decoder.decode(&document, shape)?)
}

fn read_capped(path: &Path) -> ConfigResult<String> {
    // Check file size before reading to prevent OOM.
    let metadata = std::fs::metadata(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    if metadata.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "file is {} bytes, exceeding the {MAX_CONFIG_FILE_SIZE} byte limit",
                metadata.len()
            ),
        });
    }
    std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })
}
