//! The event registry: named events mapped to ordered subscriber callbacks.

use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, trace, warn};

use crate::subscriber::{Callback, DeliveryPolicy, PatternCallback, SubscriberId};
use crate::subscription::Subscription;

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

struct Entry<P> {
    id: SubscriberId,
    callback: Callback<P>,
}

impl<P> Clone for Entry<P> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            callback: Arc::clone(&self.callback),
        }
    }
}

struct PatternEntry<P> {
    id: SubscriberId,
    /// `None` matches every event.
    prefix: Option<String>,
    callback: PatternCallback<P>,
}

impl<P> PatternEntry<P> {
    fn matches(&self, event: &str) -> bool {
        self.prefix
            .as_deref()
            .is_none_or(|prefix| event.starts_with(prefix))
    }
}

impl<P> Clone for PatternEntry<P> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            prefix: self.prefix.clone(),
            callback: Arc::clone(&self.callback),
        }
    }
}

/// Shared state behind an [`EventRegistry`] and its clones.
pub(crate) struct Inner<P> {
    named: RwLock<HashMap<String, Vec<Entry<P>>>>,
    patterns: RwLock<Vec<PatternEntry<P>>>,
    policy: DeliveryPolicy,
}

impl<P> Inner<P> {
    fn new(policy: DeliveryPolicy) -> Self {
        Self {
            named: RwLock::new(HashMap::new()),
            patterns: RwLock::new(Vec::new()),
            policy,
        }
    }

    fn insert(&self, event: String, id: SubscriberId, callback: Callback<P>) {
        debug!(event = %event, subscriber_id = %id, "Subscriber registered");
        write(&self.named)
            .entry(event)
            .or_default()
            .push(Entry { id, callback });
    }

    fn insert_pattern(&self, prefix: Option<String>, callback: PatternCallback<P>) -> SubscriberId {
        let id = SubscriberId::new();
        debug!(
            prefix = prefix.as_deref().unwrap_or("*"),
            subscriber_id = %id,
            "Wildcard subscriber registered"
        );
        write(&self.patterns).push(PatternEntry {
            id,
            prefix,
            callback,
        });
        id
    }

    /// Remove the registration with the given ID, named or wildcard.
    pub(crate) fn remove(&self, id: SubscriberId) -> bool {
        // Removed callbacks are dropped after the locks are released, so a
        // callback whose drop touches the registry cannot deadlock.
        let removed_named = {
            let mut named = write(&self.named);
            let found = named.iter_mut().find_map(|(event, entries)| {
                let pos = entries.iter().position(|e| e.id == id)?;
                Some((event.clone(), entries.remove(pos), entries.is_empty()))
            });
            if let Some((event, _, true)) = &found {
                named.remove(event);
            }
            found.map(|(event, entry, _)| (event, entry))
        };

        if let Some((event, _entry)) = removed_named {
            debug!(event = %event, subscriber_id = %id, "Subscriber unregistered");
            return true;
        }

        let removed_pattern = {
            let mut patterns = write(&self.patterns);
            patterns
                .iter()
                .position(|p| p.id == id)
                .map(|pos| patterns.remove(pos))
        };

        if removed_pattern.is_some() {
            debug!(subscriber_id = %id, "Wildcard subscriber unregistered");
            return true;
        }

        false
    }

    pub(crate) fn contains(&self, id: SubscriberId) -> bool {
        read(&self.named)
            .values()
            .any(|entries| entries.iter().any(|e| e.id == id))
            || read(&self.patterns).iter().any(|p| p.id == id)
    }
}

/// In-memory registry of named events and their subscribers.
///
/// Each event name maps to an ordered list of callbacks. Publishing an event
/// invokes its callbacks synchronously, in registration order, on the
/// caller's thread, followed by any wildcard subscribers that match.
///
/// Cloning is cheap: clones share the same subscribers, so a registry can be
/// handed to every component that needs it instead of living in a global.
///
/// Callbacks run without any internal lock held. A callback may subscribe,
/// unsubscribe or publish on the same registry; such changes apply from the
/// next publish onward.
pub struct EventRegistry<P> {
    inner: Arc<Inner<P>>,
}

impl<P> Clone for EventRegistry<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: 'static> Default for EventRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for EventRegistry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let events = read(&self.inner.named).len();
        let wildcards = read(&self.inner.patterns).len();
        f.debug_struct("EventRegistry")
            .field("event_count", &events)
            .field("wildcard_count", &wildcards)
            .field("policy", &self.inner.policy)
            .finish()
    }
}

impl<P: 'static> EventRegistry<P> {
    /// Create an empty registry that lets subscriber panics propagate.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(DeliveryPolicy::default())
    }

    /// Create an empty registry with the given delivery policy.
    #[must_use]
    pub fn with_policy(policy: DeliveryPolicy) -> Self {
        Self {
            inner: Arc::new(Inner::new(policy)),
        }
    }

    /// The delivery policy used by [`publish`](Self::publish).
    #[must_use]
    pub fn policy(&self) -> DeliveryPolicy {
        self.inner.policy
    }

    /// Register `callback` under `event`, after any existing callbacks.
    ///
    /// Registering the same callback twice is allowed; it then fires twice
    /// per publish.
    pub fn subscribe(&self, event: impl Into<String>, callback: Callback<P>) -> SubscriberId {
        let id = SubscriberId::new();
        self.inner.insert(event.into(), id, callback);
        id
    }

    /// Register a closure and return the callback handle needed to
    /// [`unsubscribe`](Self::unsubscribe) it.
    pub fn subscribe_fn<F>(&self, event: impl Into<String>, f: F) -> Callback<P>
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        let callback: Callback<P> = Arc::new(f);
        self.subscribe(event, Arc::clone(&callback));
        callback
    }

    /// Register a closure that fires on the next publish of `event` only,
    /// then removes itself.
    pub fn subscribe_once<F>(&self, event: impl Into<String>, f: F) -> SubscriberId
    where
        F: FnOnce(&P) + Send + 'static,
    {
        let id = SubscriberId::new();
        let inner = Arc::downgrade(&self.inner);
        let slot = Mutex::new(Some(f));

        let callback: Callback<P> = Arc::new(move |payload: &P| {
            let Some(f) = slot.lock().unwrap_or_else(PoisonError::into_inner).take() else {
                return;
            };
            if let Some(inner) = inner.upgrade() {
                inner.remove(id);
            }
            f(payload);
        });

        self.inner.insert(event.into(), id, callback);
        id
    }

    /// Register `callback` under `event` and tie the registration to the
    /// returned guard. Dropping the guard unsubscribes.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe_scoped(&self, event: impl Into<String>, callback: Callback<P>) -> Subscription<P> {
        let id = self.subscribe(event, callback);
        Subscription::new(Arc::downgrade(&self.inner), id)
    }

    /// Register a wildcard callback that receives every published event.
    ///
    /// Wildcard callbacks run after the named callbacks of the event.
    pub fn subscribe_all<F>(&self, f: F) -> SubscriberId
    where
        F: Fn(&str, &P) + Send + Sync + 'static,
    {
        self.inner.insert_pattern(None, Arc::new(f))
    }

    /// Register a wildcard callback for events whose name starts with `prefix`.
    pub fn subscribe_prefix<F>(&self, prefix: impl Into<String>, f: F) -> SubscriberId
    where
        F: Fn(&str, &P) + Send + Sync + 'static,
    {
        self.inner.insert_pattern(Some(prefix.into()), Arc::new(f))
    }

    /// Remove the first registration of `callback` under `event`.
    ///
    /// Only a reference-identical callback matches. Unknown events and
    /// callbacks are ignored. Returns `true` if a registration was removed.
    pub fn unsubscribe(&self, event: &str, callback: &Callback<P>) -> bool {
        let removed = {
            let mut named = write(&self.inner.named);
            let Some(entries) = named.get_mut(event) else {
                return false;
            };
            let Some(pos) = entries
                .iter()
                .position(|e| Arc::ptr_eq(&e.callback, callback))
            else {
                return false;
            };
            let entry = entries.remove(pos);
            if entries.is_empty() {
                named.remove(event);
            }
            entry
        };

        debug!(event, subscriber_id = %removed.id, "Subscriber unregistered");
        true
    }

    /// Remove a registration by ID. Returns `true` if it existed.
    pub fn unsubscribe_id(&self, id: SubscriberId) -> bool {
        self.inner.remove(id)
    }

    /// Remove every callback registered under `event`.
    ///
    /// Returns the number of callbacks removed. Wildcard subscribers are
    /// not affected.
    pub fn clear_event(&self, event: &str) -> usize {
        let removed = write(&self.inner.named).remove(event).unwrap_or_default();
        if !removed.is_empty() {
            debug!(event, count = removed.len(), "Event subscribers cleared");
        }
        removed.len()
    }

    /// Remove every subscriber, named and wildcard.
    pub fn clear(&self) {
        let named = std::mem::take(&mut *write(&self.inner.named));
        let patterns = std::mem::take(&mut *write(&self.inner.patterns));
        drop((named, patterns));
        debug!("All subscribers cleared");
    }

    /// Publish `payload` to every subscriber of `event`.
    ///
    /// Callbacks run synchronously in registration order; wildcard callbacks
    /// follow. Publishing an event nobody listens to does nothing.
    ///
    /// Returns the number of callbacks invoked.
    ///
    /// # Panics
    ///
    /// With [`DeliveryPolicy::Propagate`], a panicking callback unwinds out
    /// of this call and the remaining callbacks are skipped.
    pub fn publish(&self, event: &str, payload: &P) -> usize {
        let named: Vec<Entry<P>> = read(&self.inner.named)
            .get(event)
            .map(|entries| entries.to_vec())
            .unwrap_or_default();
        let patterns: Vec<PatternEntry<P>> = read(&self.inner.patterns)
            .iter()
            .filter(|p| p.matches(event))
            .cloned()
            .collect();

        if named.is_empty() && patterns.is_empty() {
            trace!(event, "No subscribers for event");
            return 0;
        }

        trace!(
            event,
            subscribers = named.len(),
            wildcards = patterns.len(),
            "Publishing event"
        );

        for entry in &named {
            self.deliver(event, entry.id, || (entry.callback)(payload));
        }
        for pattern in &patterns {
            self.deliver(event, pattern.id, || (pattern.callback)(event, payload));
        }

        named.len().saturating_add(patterns.len())
    }

    fn deliver(&self, event: &str, id: SubscriberId, f: impl FnOnce()) {
        trace!(event, subscriber_id = %id, "Notifying subscriber");

        match self.inner.policy {
            DeliveryPolicy::Propagate => f(),
            DeliveryPolicy::Isolate => {
                if let Err(e) = panic::catch_unwind(AssertUnwindSafe(f)) {
                    warn!(
                        event,
                        subscriber_id = %id,
                        panic = panic_message(e.as_ref()),
                        "Subscriber panicked"
                    );
                }
            },
        }
    }

    /// Number of callbacks a publish of `event` would invoke, wildcards included.
    #[must_use]
    pub fn subscriber_count(&self, event: &str) -> usize {
        let named = read(&self.inner.named).get(event).map_or(0, Vec::len);
        let wildcards = read(&self.inner.patterns)
            .iter()
            .filter(|p| p.matches(event))
            .count();
        named.saturating_add(wildcards)
    }

    /// Whether publishing `event` would reach at least one callback.
    #[must_use]
    pub fn has_subscribers(&self, event: &str) -> bool {
        self.subscriber_count(event) > 0
    }

    /// Names of events with at least one named subscriber, sorted.
    #[must_use]
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = read(&self.inner.named).keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Total number of registrations, named and wildcard.
    #[must_use]
    pub fn len(&self) -> usize {
        let named: usize = read(&self.inner.named).values().map(Vec::len).sum();
        named.saturating_add(read(&self.inner.patterns).len())
    }

    /// Whether the registry has no registrations at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscriber::callback;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) -> Callback<String>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_clone = Arc::clone(&log);
        let make = move |label: &str| {
            let log = Arc::clone(&log_clone);
            let label = label.to_string();
            callback(move |payload: &String| {
                log.lock().unwrap().push(format!("{label}:{payload}"));
            })
        };
        (log, make)
    }

    #[test]
    fn test_publish_invokes_subscriber_once_with_payload() {
        let registry = EventRegistry::new();
        let (log, make) = recorder();

        registry.subscribe("form-submitted", make("log"));
        let count = registry.publish("form-submitted", &"Alice".to_string());

        assert_eq!(count, 1);
        assert_eq!(*log.lock().unwrap(), vec!["log:Alice"]);
    }

    #[test]
    fn test_subscribers_fire_in_registration_order() {
        let registry = EventRegistry::new();
        let (log, make) = recorder();

        registry.subscribe("form-submitted", make("logName"));
        registry.subscribe("form-submitted", make("greetName"));
        registry.publish("form-submitted", &"Alice".to_string());

        assert_eq!(
            *log.lock().unwrap(),
            vec!["logName:Alice", "greetName:Alice"]
        );
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let registry = EventRegistry::new();
        let (log, make) = recorder();
        let cb = make("log");

        registry.subscribe("saved", Arc::clone(&cb));
        assert!(registry.unsubscribe("saved", &cb));
        assert_eq!(registry.publish("saved", &"x".to_string()), 0);

        assert!(log.lock().unwrap().is_empty());
        assert!(registry.is_empty());
        assert!(registry.event_names().is_empty());
    }

    #[test]
    fn test_duplicate_subscription_fires_twice() {
        let registry = EventRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);
        let cb = callback(move |_: &u32| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        registry.subscribe("tick", Arc::clone(&cb));
        registry.subscribe("tick", Arc::clone(&cb));
        registry.publish("tick", &1);

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unsubscribe_removes_only_first_duplicate() {
        let registry = EventRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);
        let cb = callback(move |_: &u32| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        registry.subscribe("tick", Arc::clone(&cb));
        registry.subscribe("tick", Arc::clone(&cb));
        assert!(registry.unsubscribe("tick", &cb));
        assert_eq!(registry.subscriber_count("tick"), 1);

        registry.publish("tick", &1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe_requires_identical_callback() {
        let registry = EventRegistry::<u32>::new();
        let registered = callback(|_: &u32| {});
        let lookalike = callback(|_: &u32| {});

        registry.subscribe("tick", Arc::clone(&registered));

        assert!(!registry.unsubscribe("tick", &lookalike));
        assert!(!registry.unsubscribe("other", &registered));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unsubscribe_unknown_is_noop() {
        let registry = EventRegistry::<u32>::new();
        let cb = callback(|_: &u32| {});

        assert!(!registry.unsubscribe("never", &cb));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_publish_without_subscribers_is_noop() {
        let registry = EventRegistry::<u32>::new();
        assert_eq!(registry.publish("nobody-listens", &7), 0);
    }

    #[test]
    fn test_events_are_independent() {
        let registry = EventRegistry::new();
        let (log, make) = recorder();

        registry.subscribe("a", make("a"));
        registry.subscribe("b", make("b"));
        registry.publish("b", &"1".to_string());

        assert_eq!(*log.lock().unwrap(), vec!["b:1"]);
        assert_eq!(registry.event_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_subscribe_fn_returns_removable_handle() {
        let registry = EventRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);

        let handle = registry.subscribe_fn("tick", move |_: &u32| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        registry.publish("tick", &1);
        assert!(registry.unsubscribe("tick", &handle));
        registry.publish("tick", &2);

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscribe_once_fires_once() {
        let registry = EventRegistry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);

        registry.subscribe_once("ready", move |v: &u32| {
            seen_clone.lock().unwrap().push(*v);
        });
        assert_eq!(registry.publish("ready", &1), 1);
        assert_eq!(registry.publish("ready", &2), 0);

        assert_eq!(*seen.lock().unwrap(), vec![1]);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_wildcards_run_after_named_subscribers() {
        let registry = EventRegistry::new();
        let (log, make) = recorder();
        let log_clone = Arc::clone(&log);

        registry.subscribe_all(move |event: &str, payload: &String| {
            log_clone.lock().unwrap().push(format!("*:{event}:{payload}"));
        });
        registry.subscribe("form-submitted", make("named"));

        assert_eq!(registry.publish("form-submitted", &"Bob".to_string()), 2);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["named:Bob", "*:form-submitted:Bob"]
        );
    }

    #[test]
    fn test_wildcards_keep_their_own_registration_order() {
        let registry = EventRegistry::new();
        let (log, make) = recorder();

        let all_first = Arc::clone(&log);
        registry.subscribe_all(move |_: &str, payload: &String| {
            all_first.lock().unwrap().push(format!("all#1:{payload}"));
        });
        let prefixed = Arc::clone(&log);
        registry.subscribe_prefix("form", move |_: &str, payload: &String| {
            prefixed.lock().unwrap().push(format!("prefix:{payload}"));
        });
        let all_second = Arc::clone(&log);
        registry.subscribe_all(move |_: &str, payload: &String| {
            all_second.lock().unwrap().push(format!("all#2:{payload}"));
        });
        registry.subscribe("form-submitted", make("named"));

        assert_eq!(registry.publish("form-submitted", &"Eve".to_string()), 4);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["named:Eve", "all#1:Eve", "prefix:Eve", "all#2:Eve"]
        );
    }

    #[test]
    fn test_prefix_subscriber_filters_by_name() {
        let registry = EventRegistry::new();
        let hits = Arc::new(Mutex::new(Vec::new()));
        let hits_clone = Arc::clone(&hits);

        let id = registry.subscribe_prefix("form.", move |event: &str, _: &u32| {
            hits_clone.lock().unwrap().push(event.to_string());
        });
        registry.publish("form.submitted", &1);
        registry.publish("modal.closed", &1);

        assert_eq!(*hits.lock().unwrap(), vec!["form.submitted"]);
        assert_eq!(registry.subscriber_count("form.reset"), 1);
        assert_eq!(registry.subscriber_count("modal.closed"), 0);

        assert!(registry.unsubscribe_id(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_clear_event_removes_only_that_event() {
        let registry = EventRegistry::<u32>::new();
        registry.subscribe("a", callback(|_| {}));
        registry.subscribe("a", callback(|_| {}));
        registry.subscribe("b", callback(|_| {}));

        assert_eq!(registry.clear_event("a"), 2);
        assert_eq!(registry.clear_event("a"), 0);
        assert_eq!(registry.event_names(), vec!["b"]);

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_clones_share_subscribers() {
        let registry = EventRegistry::new();
        let cloned = registry.clone();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);

        cloned.subscribe_fn("tick", move |_: &u32| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        registry.publish("tick", &1);

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_panic_propagates_by_default() {
        let registry = EventRegistry::new();
        let later = Arc::new(AtomicUsize::new(0));
        let later_clone = Arc::clone(&later);

        registry.subscribe_fn("boom", |_: &u32| panic!("subscriber failed"));
        registry.subscribe_fn("boom", move |_: &u32| {
            later_clone.fetch_add(1, Ordering::SeqCst);
        });

        let result = panic::catch_unwind(AssertUnwindSafe(|| registry.publish("boom", &1)));
        assert!(result.is_err());
        assert_eq!(later.load(Ordering::SeqCst), 0);

        // The registry stays usable after a propagated panic.
        assert_eq!(registry.subscriber_count("boom"), 2);
    }

    #[test]
    fn test_isolate_policy_contains_panics() {
        let registry = EventRegistry::with_policy(DeliveryPolicy::Isolate);
        let later = Arc::new(AtomicUsize::new(0));
        let later_clone = Arc::clone(&later);

        registry.subscribe_fn("boom", |_: &u32| panic!("subscriber failed"));
        registry.subscribe_fn("boom", move |_: &u32| {
            later_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(registry.publish("boom", &1), 2);
        assert_eq!(later.load(Ordering::SeqCst), 1);
        assert_eq!(registry.policy(), DeliveryPolicy::Isolate);
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_isolated_panic_is_logged_and_registry_stays_usable() {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();

        let registry = EventRegistry::with_policy(DeliveryPolicy::Isolate);
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = Arc::clone(&hits);

        let broken = registry.subscribe("boom", callback(|_: &u32| panic!("subscriber failed")));
        registry.subscribe_fn("boom", move |_: &u32| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });

        tracing::subscriber::with_default(subscriber, || {
            assert_eq!(registry.publish("boom", &1), 2);
        });

        let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("WARN"));
        assert!(logs.contains("Subscriber panicked"));
        assert!(logs.contains("boom"));
        assert!(logs.contains(&broken.to_string()));
        assert!(logs.contains("subscriber failed"));

        // Registrations are untouched and a second publish behaves the same.
        assert_eq!(registry.subscriber_count("boom"), 2);
        assert_eq!(registry.publish("boom", &2), 2);
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        assert!(registry.unsubscribe_id(broken));
        assert_eq!(registry.publish("boom", &3), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_reentrancy_unsubscribe_from_callback() {
        let registry = EventRegistry::<u32>::new();
        let handle: Arc<Mutex<Option<Callback<u32>>>> = Arc::new(Mutex::new(None));

        let registry_clone = registry.clone();
        let handle_clone = Arc::clone(&handle);
        let cb = callback(move |_: &u32| {
            let cb = handle_clone.lock().unwrap().clone().unwrap();
            // Must not deadlock against publish.
            registry_clone.unsubscribe("tick", &cb);
        });
        *handle.lock().unwrap() = Some(Arc::clone(&cb));

        registry.subscribe("tick", cb);
        registry.publish("tick", &1);

        assert!(registry.is_empty());
        // Break the cycle between the callback and its own handle.
        handle.lock().unwrap().take();
    }

    #[test]
    fn test_reentrancy_publish_from_callback() {
        let registry = EventRegistry::<u32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = Arc::clone(&seen);
        registry.subscribe_fn("second", move |v: &u32| {
            seen_clone.lock().unwrap().push(*v);
        });

        let registry_clone = registry.clone();
        registry.subscribe_fn("first", move |v: &u32| {
            registry_clone.publish("second", &v.saturating_mul(10));
        });

        registry.publish("first", &4);
        assert_eq!(*seen.lock().unwrap(), vec![40]);
    }

    #[test]
    fn test_subscribing_during_publish_applies_next_time() {
        let registry = EventRegistry::<u32>::new();
        let count = Arc::new(AtomicUsize::new(0));

        let registry_clone = registry.clone();
        let count_clone = Arc::clone(&count);
        registry.subscribe_once("tick", move |_: &u32| {
            let count = Arc::clone(&count_clone);
            registry_clone.subscribe_fn("tick", move |_: &u32| {
                count.fetch_add(1, Ordering::SeqCst);
            });
        });

        assert_eq!(registry.publish("tick", &1), 1);
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(registry.publish("tick", &2), 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_debug_output() {
        let registry = EventRegistry::<u32>::new();
        registry.subscribe("a", callback(|_| {}));
        let debug = format!("{registry:?}");
        assert!(debug.contains("event_count: 1"));
        assert!(debug.contains("Propagate"));
    }
}
