//! Event bus error types.

use thiserror::Error;

/// Errors that can occur when working with typed topics.
///
/// The plain [`EventRegistry`](crate::EventRegistry) operations never fail;
/// only the type-checked [`TopicBus`](crate::TopicBus) can reject a call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// A topic name was used with a payload type other than the one it is bound to.
    #[error("topic '{topic}' carries {expected} payloads, not {found}")]
    PayloadMismatch {
        /// The topic name.
        topic: String,
        /// The payload type the topic was first bound to.
        expected: &'static str,
        /// The payload type of the offending call.
        found: &'static str,
    },
}

/// Result type for event bus operations.
pub type EventResult<T> = Result<T, EventError>;
