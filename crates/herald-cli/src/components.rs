//! Demo components that communicate only through an event registry.
//!
//! Each listening component subscribes when it is mounted and keeps the
//! guards in a [`SubscriptionSet`]; dropping the component unmounts it.

use std::sync::{Arc, Mutex, PoisonError};

use herald_events::{EventRegistry, SubscriptionSet, callback};
use tracing::info;

/// Event published when the signup form is submitted. Payload: the name.
pub const FORM_SUBMITTED: &str = "form-submitted";

/// Event published when the signup form is cleared. Payload: empty string.
pub const FORM_RESET: &str = "form-reset";

type Journal = Arc<Mutex<Vec<String>>>;

fn record(journal: &Journal, line: String) {
    journal
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(line);
}

fn snapshot(journal: &Journal) -> Vec<String> {
    journal
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// The producer: publishes form events, knows nothing about listeners.
#[derive(Debug, Clone)]
pub struct SignupForm {
    bus: EventRegistry<String>,
}

impl SignupForm {
    /// Create a form that publishes on `bus`.
    #[must_use]
    pub fn new(bus: EventRegistry<String>) -> Self {
        Self { bus }
    }

    /// Submit the form. Returns how many listeners were notified.
    pub fn submit(&self, name: &str) -> usize {
        info!(name, "form submitted");
        self.bus.publish(FORM_SUBMITTED, &name.to_owned())
    }

    /// Clear the form. Returns how many listeners were notified.
    pub fn reset(&self) -> usize {
        self.bus.publish(FORM_RESET, &String::new())
    }
}

/// Listener that records every submitted name.
#[derive(Debug)]
pub struct NameLog {
    entries: Journal,
    _subscriptions: SubscriptionSet<String>,
}

impl NameLog {
    /// Mount the component: subscribe to form events.
    #[must_use]
    pub fn mount(bus: &EventRegistry<String>) -> Self {
        let entries: Journal = Arc::default();
        let mut subscriptions = SubscriptionSet::new();

        let log = Arc::clone(&entries);
        subscriptions.push(bus.subscribe_scoped(
            FORM_SUBMITTED,
            callback(move |name: &String| record(&log, format!("submitted: {name}"))),
        ));
        let log = Arc::clone(&entries);
        subscriptions.push(bus.subscribe_scoped(
            FORM_RESET,
            callback(move |_: &String| record(&log, "reset".to_owned())),
        ));

        Self {
            entries,
            _subscriptions: subscriptions,
        }
    }

    /// Everything recorded so far.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        snapshot(&self.entries)
    }
}

/// Listener that greets whoever submitted the form.
#[derive(Debug)]
pub struct Greeter {
    greetings: Journal,
    _subscriptions: SubscriptionSet<String>,
}

impl Greeter {
    /// Mount the component: subscribe to form submissions.
    #[must_use]
    pub fn mount(bus: &EventRegistry<String>) -> Self {
        let greetings: Journal = Arc::default();
        let mut subscriptions = SubscriptionSet::new();

        let out = Arc::clone(&greetings);
        subscriptions.push(bus.subscribe_scoped(
            FORM_SUBMITTED,
            callback(move |name: &String| record(&out, format!("Hello, {name}!"))),
        ));

        Self {
            greetings,
            _subscriptions: subscriptions,
        }
    }

    /// Greetings produced so far.
    #[must_use]
    pub fn greetings(&self) -> Vec<String> {
        snapshot(&self.greetings)
    }
}
