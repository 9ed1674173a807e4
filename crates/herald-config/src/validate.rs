//! Post-merge configuration validation.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

const DELIVERY_MODES: [&str; 2] = ["propagate", "isolate"];
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 3] = ["pretty", "compact", "json"];
const ROTATIONS: [&str; 3] = ["daily", "hourly", "never"];

/// Validate a fully-merged configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    one_of("bus.delivery", &config.bus.delivery, &DELIVERY_MODES)?;
    one_of("logging.level", &config.logging.level, &LOG_LEVELS)?;
    one_of("logging.format", &config.logging.format, &LOG_FORMATS)?;
    one_of("logging.rotation", &config.logging.rotation, &ROTATIONS)?;

    if config.logging.file_prefix.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "logging.file_prefix".to_owned(),
            message: "must not be empty".to_owned(),
        });
    }

    Ok(())
}

fn one_of(field: &str, value: &str, allowed: &[&str]) -> ConfigResult<()> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        field: field.to_owned(),
        message: format!(
            "unsupported value '{value}'; expected one of: {}",
            allowed.join(", ")
        ),
    })
}
