//! Bridge from `herald_config::Config` to domain types.

use herald_config::Config;
use herald_events::DeliveryPolicy;
use herald_telemetry::{FileRotation, LogConfig, LogFormat};

/// Convert the configured delivery mode to a [`DeliveryPolicy`].
#[must_use]
pub fn to_delivery_policy(cfg: &Config) -> DeliveryPolicy {
    match cfg.bus.delivery.as_str() {
        "isolate" => DeliveryPolicy::Isolate,
        _ => DeliveryPolicy::Propagate,
    }
}

/// Map a validated `logging.format` value to a [`LogFormat`].
#[must_use]
pub fn to_log_format(format: &str) -> LogFormat {
    match format {
        "compact" => LogFormat::Compact,
        "json" => LogFormat::Json,
        _ => LogFormat::Pretty,
    }
}

/// Convert config to [`LogConfig`].
#[must_use]
pub fn to_log_config(cfg: &Config) -> LogConfig {
    let logging = &cfg.logging;
    let mut log_config = LogConfig::new(&logging.level).with_format(to_log_format(&logging.format));

    for directive in &logging.directives {
        log_config = log_config.with_directive(directive);
    }
    if !logging.timestamps {
        log_config = log_config.without_timestamps();
    }
    if !logging.ansi {
        log_config = log_config.without_ansi();
    }
    if let Some(dir) = &logging.directory {
        let rotation = match logging.rotation.as_str() {
            "hourly" => FileRotation::Hourly,
            "never" => FileRotation::Never,
            _ => FileRotation::Daily,
        };
        log_config = log_config.with_file_logging(dir, &logging.file_prefix, rotation);
    }

    log_config
}
