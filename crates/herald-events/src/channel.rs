//! Channel-backed receivers for async consumers.
//!
//! A receiver is an ordinary registration whose callback forwards a clone of
//! each payload into an unbounded channel. Delivery into the channel still
//! happens synchronously inside [`EventRegistry::publish`]; only the
//! consumption side is async.

use tokio::sync::mpsc;
use tracing::trace;

use crate::registry::EventRegistry;
use crate::subscriber::Callback;
use crate::subscription::Subscription;

/// Receiver for the payloads of one event.
///
/// Dropping the receiver unsubscribes it.
#[derive(Debug)]
pub struct EventReceiver<P> {
    receiver: mpsc::UnboundedReceiver<P>,
    event: String,
    _subscription: Subscription<P>,
}

impl<P> EventReceiver<P> {
    /// Name of the event this receiver listens to.
    #[must_use]
    pub fn event_name(&self) -> &str {
        &self.event
    }

    /// Receive the next payload.
    ///
    /// Returns `None` once the registry has been dropped and every buffered
    /// payload has been read.
    pub async fn recv(&mut self) -> Option<P> {
        self.receiver.recv().await
    }

    /// Take the next buffered payload without waiting.
    pub fn try_recv(&mut self) -> Option<P> {
        self.receiver.try_recv().ok()
    }
}

impl<P: Clone + Send + 'static> EventRegistry<P> {
    /// Subscribe to `event` through a channel.
    ///
    /// ```rust
    /// use herald_events::EventRegistry;
    ///
    /// # async fn example() {
    /// let registry = EventRegistry::<String>::new();
    /// let mut receiver = registry.subscribe_channel("form-submitted");
    ///
    /// registry.publish("form-submitted", &"Alice".to_string());
    /// assert_eq!(receiver.recv().await.as_deref(), Some("Alice"));
    /// # }
    /// ```
    #[must_use]
    pub fn subscribe_channel(&self, event: impl Into<String>) -> EventReceiver<P> {
        let event = event.into();
        let (sender, receiver) = mpsc::unbounded_channel();

        let name = event.clone();
        let callback: Callback<P> = std::sync::Arc::new(move |payload: &P| {
            if sender.send(payload.clone()).is_err() {
                trace!(event = %name, "Channel receiver closed, payload dropped");
            }
        });

        let subscription = self.subscribe_scoped(event.clone(), callback);
        EventReceiver {
            receiver,
            event,
            _subscription: subscription,
        }
    }
}
