//! Configuration validation.

use chrono::format::{Item, StrftimeItems};

use crate::error::{ConfigError, ConfigResult};
use crate::types::{ComposeMode, Config};

/// Upper bound for `decode.max_depth`.
const MAX_DEPTH_UPPER_BOUND: usize = 1024;

/// Validate a deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_hooks(config)?;
    validate_delimiter(config)?;
    validate_time_layout(config)?;
    validate_depth(config)?;
    Ok(())
}

fn validate_hooks(config: &Config) -> ConfigResult<()> {
    let d = &config.decode;

    if let Some(idx) = d.hooks.iter().position(|name| name.trim().is_empty()) {
        return Err(ConfigError::ValidationError {
            field: format!("decode.hooks[{idx}]"),
            message: "hook name must not be empty".to_owned(),
        });
    }

    if d.compose == ComposeMode::Any && d.hooks.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "decode.compose".to_owned(),
            message: "compose = \"any\" needs at least one hook".to_owned(),
        });
    }

    Ok(())
}

fn validate_delimiter(config: &Config) -> ConfigResult<()> {
    if config.decode.slice_delimiter.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "decode.slice_delimiter".to_owned(),
            message: "slice_delimiter must not be empty".to_owned(),
        });
    }
    Ok(())
}

fn validate_time_layout(config: &Config) -> ConfigResult<()> {
    let layout = config.decode.time_layout.as_str();
    if matches!(layout, "rfc3339" | "rfc2822") {
        return Ok(());
    }
    if layout.is_empty() || StrftimeItems::new(layout).any(|item| matches!(item, Item::Error)) {
        return Err(ConfigError::ValidationError {
            field: "decode.time_layout".to_owned(),
            message: "expected \"rfc3339\", \"rfc2822\" or a valid strftime pattern".to_owned(),
        });
    }
    Ok(())
}

fn validate_depth(config: &Config) -> ConfigResult<()> {
    let depth = config.decode.max_depth;
    if depth == 0 || depth > MAX_DEPTH_UPPER_BOUND {
        return Err(ConfigError::ValidationError {
            field: "decode.max_depth".to_owned(),
            message: format!("max_depth must be between 1 and {MAX_DEPTH_UPPER_BOUND}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(result: ConfigResult<()>) -> String {
        match result {
            Err(ConfigError::ValidationError { field, .. }) => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_empty_hook_name() {
        let mut config = Config::default();
        config.decode.hooks.push("  ".to_owned());
        assert_eq!(field_of(validate(&config)), "decode.hooks[2]");
    }

    #[test]
    fn test_any_requires_hooks() {
        let mut config = Config::default();
        config.decode.compose = ComposeMode::Any;
        config.decode.hooks.clear();
        assert_eq!(field_of(validate(&config)), "decode.compose");
    }

    #[test]
    fn test_empty_delimiter() {
        let mut config = Config::default();
        config.decode.slice_delimiter.clear();
        assert_eq!(field_of(validate(&config)), "decode.slice_delimiter");
    }

    #[test]
    fn test_time_layouts() {
        let mut config = Config::default();
        config.decode.time_layout = "%Y-%m-%d %H:%M".to_owned();
        assert!(validate(&config).is_ok());
        config.decode.time_layout = "%Q".to_owned();
        assert_eq!(field_of(validate(&config)), "decode.time_layout");
    }

    #[test]
    fn test_depth_bounds() {
        let mut config = Config::default();
        config.decode.max_depth = 0;
        assert_eq!(field_of(validate(&config)), "decode.max_depth");
        config.decode.max_depth = 4096;
        assert_eq!(field_of(validate(&config)), "decode.max_depth");
    }
}
