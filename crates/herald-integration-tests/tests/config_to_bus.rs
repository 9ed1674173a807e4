//! Integration tests wiring loaded configuration into the bus and logging.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use herald_cli::config_bridge;
use herald_config::loader;
use herald_events::{DeliveryPolicy, EventRegistry};
use herald_telemetry::{LogFormat, LogTarget};

#[test]
fn test_isolate_from_config_file_contains_panics() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("herald.toml");
    std::fs::write(&path, "[bus]\ndelivery = \"isolate\"\n").unwrap();

    let resolved = loader::load_from(None, Some(&path), &HashMap::new()).unwrap();
    let policy = config_bridge::to_delivery_policy(&resolved.config);
    assert_eq!(policy, DeliveryPolicy::Isolate);

    let bus = EventRegistry::<u32>::with_policy(policy);
    let broken = bus.subscribe_fn("boom", |_| panic!("broken subscriber"));
    bus.subscribe_fn("boom", |_| {});

    assert_eq!(bus.publish("boom", &1), 2);
    assert!(bus.unsubscribe("boom", &broken));
}

#[test]
fn test_default_config_propagates_panics() {
    let resolved = loader::load_from(None, None, &HashMap::new()).unwrap();
    let bus = EventRegistry::<u32>::with_policy(config_bridge::to_delivery_policy(&resolved.config));
    bus.subscribe_fn("boom", |_| panic!("broken subscriber"));

    let result = panic::catch_unwind(AssertUnwindSafe(|| bus.publish("boom", &1)));
    assert!(result.is_err());
}

#[test]
fn test_env_override_reaches_log_config() {
    let env = HashMap::from([
        ("HERALD_LOG_FORMAT".to_owned(), "json".to_owned()),
        ("HERALD_LOG_DIR".to_owned(), "/tmp/herald-it".to_owned()),
    ]);
    let resolved = loader::load_from(None, None, &env).unwrap();
    let log = config_bridge::to_log_config(&resolved.config);

    assert_eq!(log.format, LogFormat::Json);
    assert_eq!(log.target, LogTarget::File("/tmp/herald-it".into()));
}
