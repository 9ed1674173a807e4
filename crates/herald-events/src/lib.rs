//! Herald Events - Named-event publish/subscribe for in-process components.
//!
//! This crate provides:
//! - An event registry mapping event names to ordered subscriber callbacks
//! - Subscription guards that unsubscribe when dropped
//! - Typed topics that bind an event name to one payload type
//! - Channel-backed receivers for async consumers (`runtime` feature)
//!
//! # Architecture
//!
//! Producers publish a named event with a payload; the registry invokes
//! every callback registered under that name, synchronously and in
//! registration order, before `publish` returns. Neither side knows about
//! the other.
//!
//! There are three ways to subscribe:
//!
//! 1. **Callbacks**: `registry.subscribe(name, callback)` and the matching
//!    `registry.unsubscribe(name, &callback)`.
//!
//! 2. **Scoped subscriptions**: `registry.subscribe_scoped(name, callback)`
//!    returns a `Subscription` that unsubscribes when dropped.
//!
//! 3. **Receivers**: `registry.subscribe_channel(name)` returns an
//!    `EventReceiver` that can be polled asynchronously.
//!
//! # Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use herald_events::{EventRegistry, callback};
//!
//! let registry = EventRegistry::<String>::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let log = Arc::clone(&seen);
//! let log_name = callback(move |name: &String| log.lock().unwrap().push(format!("log {name}")));
//! let greet = Arc::clone(&seen);
//! let greet_name = callback(move |name: &String| greet.lock().unwrap().push(format!("hi {name}")));
//!
//! registry.subscribe("form-submitted", log_name.clone());
//! registry.subscribe("form-submitted", greet_name);
//! registry.publish("form-submitted", &"Alice".to_string());
//!
//! assert_eq!(*seen.lock().unwrap(), ["log Alice", "hi Alice"]);
//!
//! registry.unsubscribe("form-submitted", &log_name);
//! assert_eq!(registry.subscriber_count("form-submitted"), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

#[cfg(feature = "runtime")]
mod channel;
mod error;
mod registry;
mod subscriber;
mod subscription;
mod topic;

#[cfg(feature = "runtime")]
pub use channel::EventReceiver;
pub use error::{EventError, EventResult};
pub use registry::EventRegistry;
pub use subscriber::{Callback, DeliveryPolicy, PatternCallback, SubscriberId, callback};
pub use subscription::{Subscription, SubscriptionSet};
pub use topic::{Topic, TopicBus};
