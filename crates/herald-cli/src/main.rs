//! Herald CLI - components talking through an in-process event bus.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use herald_cli::config_bridge;
use herald_telemetry::LogFormat;

mod commands;

/// Herald - in-process publish/subscribe demo
#[derive(Parser)]
#[command(name = "herald")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a configuration file
    #[arg(short, long, global = true, env = "HERALD_CONFIG")]
    config: Option<PathBuf>,

    /// Override the configured log level
    #[arg(long, global = true, value_enum)]
    log_level: Option<LevelArg>,

    /// Override the configured log format
    #[arg(long, global = true, value_enum)]
    log_format: Option<FormatArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mount components, submit a form, unmount, and watch delivery change
    Demo,

    /// Typed topics, payload checking and channel receivers
    Topics,

    /// Print the resolved configuration
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LevelArg {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LevelArg {
    fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<FormatArg> for LogFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Pretty => LogFormat::Pretty,
            FormatArg::Compact => LogFormat::Compact,
            FormatArg::Json => LogFormat::Json,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let resolved = herald_config::Config::load(cli.config.as_deref())
        .context("failed to load configuration")?;

    let mut log_config = config_bridge::to_log_config(&resolved.config);
    if let Some(level) = cli.log_level {
        log_config.level = level.as_str().to_owned();
    }
    if let Some(format) = cli.log_format {
        log_config.format = format.into();
    }
    if let Err(e) = herald_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let policy = config_bridge::to_delivery_policy(&resolved.config);
    tracing::debug!(%policy, files = ?resolved.loaded_files, "configuration loaded");

    match cli.command {
        Commands::Demo => commands::demo::run_demo(policy),
        Commands::Topics => commands::topics::run_topics(policy).await?,
        Commands::Config => commands::config::show_config(&resolved)?,
    }

    Ok(())
}
