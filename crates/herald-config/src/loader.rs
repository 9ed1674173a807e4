//! Config file discovery and layered loading.
//!
//! Layers, lowest precedence first:
//! 1. `defaults.toml` embedded in the binary
//! 2. User config (`~/.herald/config.toml`, or `$HERALD_HOME/config.toml`)
//! 3. Explicit config file (e.g. `--config`)
//! 4. Environment variables (`HERALD_*`)
//!
//! Tables merge field by field; scalars and arrays from a higher layer
//! replace the lower value. The merged tree is then deserialized and
//! validated.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;
use crate::validate;

/// Embedded default configuration.
const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Maximum allowed config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// Environment variables that override config fields.
const ENV_OVERRIDES: [(&str, &str); 4] = [
    ("HERALD_DELIVERY", "bus.delivery"),
    ("HERALD_LOG_LEVEL", "logging.level"),
    ("HERALD_LOG_FORMAT", "logging.format"),
    ("HERALD_LOG_DIR", "logging.directory"),
];

/// A loaded configuration and where it came from.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The merged, validated configuration.
    pub config: Config,
    /// Config files that were found and merged, in merge order.
    pub loaded_files: Vec<String>,
    /// Environment variables that overrode a field.
    pub env_overrides: Vec<String>,
}

/// Load configuration with the full precedence chain.
///
/// `explicit` is a config file the user asked for by name; unlike the user
/// config, it must exist.
///
/// # Errors
///
/// Returns a [`ConfigError`] if a config file is unreadable or malformed, or
/// the merged configuration fails validation.
pub fn load(explicit: Option<&Path>) -> ConfigResult<ResolvedConfig> {
    let env_vars: HashMap<String, String> = std::env::vars()
        .filter(|(key, _)| key.starts_with("HERALD_"))
        .collect();

    let user_dir = match env_vars.get("HERALD_HOME") {
        Some(home) => PathBuf::from(home),
        None => home_directory()?.join(".herald"),
    };

    load_from(Some(&user_dir), explicit, &env_vars)
}

/// Load configuration from explicit sources.
///
/// `user_dir` is the directory holding the user's `config.toml`; `None`
/// skips the user layer.
///
/// # Errors
///
/// Returns a [`ConfigError`] if a config file is unreadable or malformed, or
/// the merged configuration fails validation.
pub fn load_from(
    user_dir: Option<&Path>,
    explicit: Option<&Path>,
    env_vars: &HashMap<String, String>,
) -> ConfigResult<ResolvedConfig> {
    let mut merged: toml::Value =
        toml::from_str(DEFAULTS_TOML).map_err(|e| ConfigError::ParseError {
            path: "<embedded defaults>".to_owned(),
            source: e,
        })?;
    let mut loaded_files = Vec::new();

    if let Some(dir) = user_dir {
        let path = dir.join("config.toml");
        if let Some(overlay) = try_load_file(&path)? {
            deep_merge(&mut merged, &overlay);
            info!(path = %path.display(), "loaded user config");
            loaded_files.push(path.display().to_string());
        }
    }

    if let Some(path) = explicit {
        let overlay = try_load_file(path)?.ok_or_else(|| ConfigError::ReadError {
            path: path.display().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        })?;
        deep_merge(&mut merged, &overlay);
        info!(path = %path.display(), "loaded config file");
        loaded_files.push(path.display().to_string());
    }

    let env_overrides = apply_env_overrides(&mut merged, env_vars);
    if !env_overrides.is_empty() {
        debug!(count = env_overrides.len(), "applied environment overrides");
    }

    let config: Config = merged
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::ParseError {
            path: "<merged config>".to_owned(),
            source: e,
        })?;

    validate::validate(&config)?;

    Ok(ResolvedConfig {
        config,
        loaded_files,
        env_overrides,
    })
}

/// Recursively deep-merge `overlay` into `base`.
fn deep_merge(base: &mut toml::Value, overlay: &toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                if let Some(base_val) = base_table.get_mut(key) {
                    deep_merge(base_val, overlay_val);
                } else {
                    base_table.insert(key.clone(), overlay_val.clone());
                }
            }
        },
        (base, overlay) => {
            *base = overlay.clone();
        },
    }
}

/// Write every set `HERALD_*` override into the merged tree.
fn apply_env_overrides(merged: &mut toml::Value, env_vars: &HashMap<String, String>) -> Vec<String> {
    let mut applied = Vec::new();
    for (var, field) in ENV_OVERRIDES {
        let Some(value) = env_vars.get(var).filter(|v| !v.is_empty()) else {
            continue;
        };
        set_path(merged, field, toml::Value::String(value.clone()));
        debug!(var, field, "environment override");
        applied.push(var.to_owned());
    }
    applied
}

/// Set a dotted `section.key` path, creating the section table if needed.
fn set_path(root: &mut toml::Value, path: &str, value: toml::Value) {
    let Some((section, key)) = path.split_once('.') else {
        return;
    };
    let Some(root) = root.as_table_mut() else {
        return;
    };
    let section = root
        .entry(section)
        .or_insert_with(|| toml::Value::Table(toml::Table::new()));
    if let Some(table) = section.as_table_mut() {
        table.insert(key.to_owned(), value);
    }
}

/// Try to load a file, returning `None` if it doesn't exist.
fn try_load_file(path: &Path) -> ConfigResult<Option<toml::Value>> {
    // Check the size before reading so an oversized file is never buffered.
    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found, skipping");
            return Ok(None);
        },
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.display().to_string(),
                source: e,
            });
        },
    };
    if metadata.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "config file is {} bytes, exceeding the {MAX_CONFIG_FILE_SIZE} byte limit",
                metadata.len()
            ),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let value = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(Some(value))
}

/// Determine the user's home directory.
fn home_directory() -> ConfigResult<PathBuf> {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHomeDir)
}
