//! Prelude module - commonly used types for convenient import.
//!
//! Use `use herald_events::prelude::*;` to import all essential types.

// Registry
pub use crate::{DeliveryPolicy, EventRegistry};

// Subscribers
pub use crate::{Callback, SubscriberId, Subscription, SubscriptionSet, callback};

// Typed topics
pub use crate::{EventError, EventResult, Topic, TopicBus};

#[cfg(feature = "runtime")]
pub use crate::EventReceiver;
