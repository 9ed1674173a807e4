//! Herald CLI library: config bridging and the demo components.
//!
//! The `herald` binary is a thin shell around these modules.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod components;
pub mod config_bridge;
