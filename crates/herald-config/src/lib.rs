//! Layered configuration for Herald.
//!
//! # Usage
//!
//! ```rust,no_run
//! use herald_config::Config;
//!
//! let resolved = Config::load(None).unwrap();
//! println!("delivery policy: {}", resolved.config.bus.delivery);
//! ```
//!
//! # Configuration Precedence
//!
//! From highest to lowest priority:
//!
//! 1. **Environment variables** (`HERALD_DELIVERY`, `HERALD_LOG_LEVEL`,
//!    `HERALD_LOG_FORMAT`, `HERALD_LOG_DIR`)
//! 2. **Explicit file** passed by the caller (e.g. `herald --config`)
//! 3. **User** (`~/.herald/config.toml`, or `$HERALD_HOME/config.toml`)
//! 4. **Embedded defaults** (`defaults.toml` compiled into the binary)
//!
//! This crate has no dependencies on other herald crates. Conversion into
//! domain types happens in the binary.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

/// Configuration error types.
pub mod error;
/// Configuration file discovery and loading.
pub mod loader;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::ResolvedConfig;
pub use types::*;

impl Config {
    /// Load configuration with the full precedence chain.
    ///
    /// See [`loader::load`] for details.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any config file is malformed or the final
    /// configuration fails validation.
    pub fn load(explicit: Option<&std::path::Path>) -> ConfigResult<ResolvedConfig> {
        loader::load(explicit)
    }
}
