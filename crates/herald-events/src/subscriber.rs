//! Subscriber callbacks, registration handles and delivery policy.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A subscriber callback for payloads of type `P`.
///
/// Callbacks are compared by reference identity ([`Arc::ptr_eq`]), so keep
/// the `Arc` around if you intend to unsubscribe it later.
pub type Callback<P> = Arc<dyn Fn(&P) + Send + Sync>;

/// A wildcard callback, invoked with the event name and the payload.
pub type PatternCallback<P> = Arc<dyn Fn(&str, &P) + Send + Sync>;

/// Wrap a closure into a [`Callback`].
///
/// ```rust
/// use herald_events::{EventRegistry, callback};
///
/// let registry = EventRegistry::<String>::new();
/// let log_name = callback(|name: &String| println!("submitted by {name}"));
///
/// registry.subscribe("form-submitted", log_name.clone());
/// assert!(registry.unsubscribe("form-submitted", &log_name));
/// ```
pub fn callback<P, F>(f: F) -> Callback<P>
where
    F: Fn(&P) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Registration handle for a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    /// Create a new, random subscriber ID.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// What `publish` does when a subscriber panics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryPolicy {
    /// Let the panic unwind into the publisher. Later subscribers of the
    /// same publish call are skipped.
    #[default]
    Propagate,
    /// Contain the panic, log it, and keep delivering to the remaining
    /// subscribers.
    Isolate,
}

impl DeliveryPolicy {
    /// Policy name as used in configuration files.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Propagate => "propagate",
            Self::Isolate => "isolate",
        }
    }
}

impl fmt::Display for DeliveryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
