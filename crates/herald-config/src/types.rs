//! Configuration types.
//!
//! These types have no dependency on the other herald crates. Values that
//! map onto domain enums (delivery policy, log format) are kept as strings
//! here, checked by [`validate`](crate::validate), and converted where the
//! binary wires things together.

use serde::{Deserialize, Serialize};

use crate::error::ConfigResult;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Event bus behavior.
    pub bus: BusSection,
    /// Logging level, format, and per-crate directives.
    pub logging: LoggingSection,
}

impl Config {
    /// Render the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Event bus configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusSection {
    /// What happens when a subscriber panics: `"propagate"` unwinds into
    /// the publisher, `"isolate"` logs and continues.
    pub delivery: String,
}

impl Default for BusSection {
    fn default() -> Self {
        Self {
            delivery: "propagate".to_owned(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"` through `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"` or `"json"`.
    pub format: String,
    /// Per-crate tracing directives (e.g. `["herald_events=trace"]`).
    pub directives: Vec<String>,
    /// Whether to print timestamps.
    pub timestamps: bool,
    /// Whether to use ANSI colors on terminal output.
    pub ansi: bool,
    /// Write rolling log files into this directory instead of stderr.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    /// File name prefix for rolling log files.
    pub file_prefix: String,
    /// Log file rotation: `"daily"`, `"hourly"` or `"never"`.
    pub rotation: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "pretty".to_owned(),
            directives: Vec::new(),
            timestamps: true,
            ansi: true,
            directory: None,
            file_prefix: "herald".to_owned(),
            rotation: "daily".to_owned(),
        }
    }
}
