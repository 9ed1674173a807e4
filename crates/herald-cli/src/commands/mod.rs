//! Subcommand implementations.

pub(crate) mod config;
pub(crate) mod demo;
pub(crate) mod topics;
