//! Scoped subscriptions that unsubscribe when dropped.

use std::fmt;
use std::sync::Weak;

use crate::registry::Inner;
use crate::subscriber::SubscriberId;

/// Guard for a single registration.
///
/// Dropping the guard removes the registration, whichever way the owning
/// scope is left. The guard only holds a weak reference, so it never keeps
/// the registry alive on its own.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription<P> {
    registry: Weak<Inner<P>>,
    id: SubscriberId,
    armed: bool,
}

impl<P> Subscription<P> {
    pub(crate) fn new(registry: Weak<Inner<P>>, id: SubscriberId) -> Self {
        Self {
            registry,
            id,
            armed: true,
        }
    }

    /// ID of the guarded registration.
    #[must_use]
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Whether the registration still exists in a live registry.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|inner| inner.contains(self.id))
    }

    /// Unsubscribe now. Returns `true` if the registration was still present.
    pub fn unsubscribe(mut self) -> bool {
        self.armed = false;
        self.registry
            .upgrade()
            .is_some_and(|inner| inner.remove(self.id))
    }

    /// Disarm the guard and keep the registration for the registry's lifetime.
    pub fn detach(mut self) -> SubscriberId {
        self.armed = false;
        self.id
    }
}

impl<P> Drop for Subscription<P> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Some(inner) = self.registry.upgrade() {
            inner.remove(self.id);
        }
    }
}

impl<P> fmt::Debug for Subscription<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("armed", &self.armed)
            .finish_non_exhaustive()
    }
}

/// The subscriptions owned by one component.
///
/// Components subscribe when they are created and push the guards here;
/// dropping the set on teardown releases all of them at once.
#[must_use = "dropping the set unsubscribes everything it holds"]
pub struct SubscriptionSet<P> {
    subscriptions: Vec<Subscription<P>>,
}

impl<P> Default for SubscriptionSet<P> {
    fn default() -> Self {
        Self {
            subscriptions: Vec::new(),
        }
    }
}

impl<P> SubscriptionSet<P> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a subscription.
    pub fn push(&mut self, subscription: Subscription<P>) {
        self.subscriptions.push(subscription);
    }

    /// Number of guards held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether the set holds no guards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Unsubscribe everything held, in reverse order of acquisition.
    pub fn clear(&mut self) {
        while let Some(subscription) = self.subscriptions.pop() {
            drop(subscription);
        }
    }
}

impl<P> Extend<Subscription<P>> for SubscriptionSet<P> {
    fn extend<I: IntoIterator<Item = Subscription<P>>>(&mut self, iter: I) {
        self.subscriptions.extend(iter);
    }
}

impl<P> Drop for SubscriptionSet<P> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<P> fmt::Debug for SubscriptionSet<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionSet")
            .field("subscriptions", &self.subscriptions)
            .finish()
    }
}
