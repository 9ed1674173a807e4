//! Herald Telemetry - Logging setup for Herald binaries.
//!
//! Library crates only emit `tracing` events; binaries call
//! [`setup_logging`] once at startup to decide where those events go.
//!
//! # Example
//!
//! ```rust,no_run
//! use herald_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), herald_telemetry::TelemetryError> {
//! let config = LogConfig::new("debug")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("herald_events=trace");
//!
//! setup_logging(&config)?;
//! tracing::info!("logging ready");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    FileLogConfig, FileRotation, LogConfig, LogFormat, LogTarget, setup_default_logging,
    setup_logging,
};
