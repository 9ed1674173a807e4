//! Typed topics: event names bound to a single payload type.

use std::any::{Any, type_name};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::error::{EventError, EventResult};
use crate::registry::EventRegistry;
use crate::subscriber::{Callback, DeliveryPolicy, SubscriberId};
use crate::subscription::Subscription;

/// An event name that carries payloads of type `P`.
///
/// ```rust
/// use herald_events::Topic;
///
/// const FORM_SUBMITTED: Topic<String> = Topic::new("form-submitted");
/// assert_eq!(FORM_SUBMITTED.name(), "form-submitted");
/// ```
pub struct Topic<P> {
    name: Cow<'static, str>,
    _payload: PhantomData<fn(&P)>,
}

impl<P> Topic<P> {
    /// Declare a topic with a static name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            _payload: PhantomData,
        }
    }

    /// Declare a topic with a runtime name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            _payload: PhantomData,
        }
    }

    /// The topic's event name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<P> Clone for Topic<P> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            _payload: PhantomData,
        }
    }
}

impl<P> fmt::Debug for Topic<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Topic")
            .field("name", &self.name)
            .field("payload", &type_name::<P>())
            .finish()
    }
}

/// A topic's registry, with its payload type erased.
struct Binding {
    payload_type: &'static str,
    registry: Box<dyn Any + Send + Sync>,
}

/// Event bus over typed topics.
///
/// Each topic name is bound to the payload type of the first call that uses
/// it. Later calls with a different payload type fail with
/// [`EventError::PayloadMismatch`] instead of delivering a payload of the
/// wrong shape.
///
/// Like [`EventRegistry`], clones share state.
#[derive(Clone)]
pub struct TopicBus {
    bindings: Arc<RwLock<HashMap<String, Binding>>>,
    policy: DeliveryPolicy,
}

impl Default for TopicBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TopicBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TopicBus")
            .field("topics", &self.topics())
            .field("policy", &self.policy)
            .finish()
    }
}

impl TopicBus {
    /// Create a bus whose topic registries let subscriber panics propagate.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(DeliveryPolicy::default())
    }

    /// Create a bus whose topic registries use `policy`.
    #[must_use]
    pub fn with_policy(policy: DeliveryPolicy) -> Self {
        Self {
            bindings: Arc::new(RwLock::new(HashMap::new())),
            policy,
        }
    }

    /// Delivery policy shared by every topic.
    #[must_use]
    pub fn policy(&self) -> DeliveryPolicy {
        self.policy
    }

    /// The registry behind `topic`, binding the topic if it is new.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::PayloadMismatch`] if the topic is bound to a
    /// different payload type.
    pub fn registry<P: Send + Sync + 'static>(
        &self,
        topic: &Topic<P>,
    ) -> EventResult<EventRegistry<P>> {
        let mut bindings = self
            .bindings
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let binding = bindings.entry(topic.name().to_owned()).or_insert_with(|| {
            debug!(topic = topic.name(), payload = type_name::<P>(), "Topic bound");
            Binding {
                payload_type: type_name::<P>(),
                registry: Box::new(EventRegistry::<P>::with_policy(self.policy)),
            }
        });
        downcast(topic, binding)
    }

    /// The registry behind `topic` if it has been bound.
    fn lookup<P: Send + Sync + 'static>(
        &self,
        topic: &Topic<P>,
    ) -> EventResult<Option<EventRegistry<P>>> {
        let bindings = self
            .bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        bindings
            .get(topic.name())
            .map(|binding| downcast(topic, binding))
            .transpose()
    }

    /// Register `callback` on `topic`.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::PayloadMismatch`] if the topic is bound to a
    /// different payload type.
    pub fn subscribe<P: Send + Sync + 'static>(
        &self,
        topic: &Topic<P>,
        callback: Callback<P>,
    ) -> EventResult<SubscriberId> {
        Ok(self.registry(topic)?.subscribe(topic.name(), callback))
    }

    /// Register a closure on `topic` and return its removable handle.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::PayloadMismatch`] if the topic is bound to a
    /// different payload type.
    pub fn subscribe_fn<P, F>(&self, topic: &Topic<P>, f: F) -> EventResult<Callback<P>>
    where
        P: Send + Sync + 'static,
        F: Fn(&P) + Send + Sync + 'static,
    {
        Ok(self.registry(topic)?.subscribe_fn(topic.name(), f))
    }

    /// Register a closure that fires on the next publish of `topic` only.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::PayloadMismatch`] if the topic is bound to a
    /// different payload type.
    pub fn subscribe_once<P, F>(&self, topic: &Topic<P>, f: F) -> EventResult<SubscriberId>
    where
        P: Send + Sync + 'static,
        F: FnOnce(&P) + Send + 'static,
    {
        Ok(self.registry(topic)?.subscribe_once(topic.name(), f))
    }

    /// Register `callback` on `topic` for the lifetime of the returned guard.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::PayloadMismatch`] if the topic is bound to a
    /// different payload type.
    pub fn subscribe_scoped<P: Send + Sync + 'static>(
        &self,
        topic: &Topic<P>,
        callback: Callback<P>,
    ) -> EventResult<Subscription<P>> {
        Ok(self.registry(topic)?.subscribe_scoped(topic.name(), callback))
    }

    /// Remove the first registration of `callback` on `topic`.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::PayloadMismatch`] if the topic is bound to a
    /// different payload type.
    pub fn unsubscribe<P: Send + Sync + 'static>(
        &self,
        topic: &Topic<P>,
        callback: &Callback<P>,
    ) -> EventResult<bool> {
        Ok(self
            .lookup(topic)?
            .is_some_and(|registry| registry.unsubscribe(topic.name(), callback)))
    }

    /// Publish `payload` on `topic`. Unbound topics have no subscribers.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::PayloadMismatch`] if the topic is bound to a
    /// different payload type.
    pub fn publish<P: Send + Sync + 'static>(
        &self,
        topic: &Topic<P>,
        payload: &P,
    ) -> EventResult<usize> {
        // The bindings lock is released before any callback runs.
        let registry = self.lookup(topic)?;
        Ok(registry.map_or(0, |registry| registry.publish(topic.name(), payload)))
    }

    /// Number of subscribers on `topic`.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::PayloadMismatch`] if the topic is bound to a
    /// different payload type.
    pub fn subscriber_count<P: Send + Sync + 'static>(
        &self,
        topic: &Topic<P>,
    ) -> EventResult<usize> {
        Ok(self
            .lookup(topic)?
            .map_or(0, |registry| registry.subscriber_count(topic.name())))
    }

    /// Names of all bound topics, sorted.
    #[must_use]
    pub fn topics(&self) -> Vec<String> {
        let bindings = self
            .bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = bindings.keys().cloned().collect();
        names.sort_unstable();
        names
    }
}

fn downcast<P: Send + Sync + 'static>(
    topic: &Topic<P>,
    binding: &Binding,
) -> EventResult<EventRegistry<P>> {
    binding
        .registry
        .downcast_ref::<EventRegistry<P>>()
        .cloned()
        .ok_or_else(|| EventError::PayloadMismatch {
            topic: topic.name().to_owned(),
            expected: binding.payload_type,
            found: type_name::<P>(),
        })
}
