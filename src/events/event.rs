//! # Lifecycle events emitted by the dispatch engine.
//!
//! The [`EventKind`] enum classifies event types across three groups:
//! - **Dispatch events**: a message was accepted / its envelope resolved
//! - **Attempt events**: per-destination attempt flow (starting, succeeded, failed, timeout, retry)
//! - **Terminal events**: a destination gave up or was cancelled
//!
//! The [`Event`] struct carries the metadata relevant to its kind: message name and id,
//! destination name, attempt number, delays and error text.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Within one destination's sequence, events are published in attempt order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use eventbridge::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::RetryScheduled)
//!     .with_destination("orders-queue")
//!     .with_attempt(2)
//!     .with_delay(Duration::from_millis(500))
//!     .with_reason("connection refused");
//!
//! assert_eq!(ev.kind, EventKind::RetryScheduled);
//! assert_eq!(ev.destination.as_deref(), Some("orders-queue"));
//! assert_eq!(ev.delay_ms, Some(500));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use uuid::Uuid;

use crate::message::Message;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets: `subscriber`, `reason`.
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `subscriber`, `reason`.
    SubscriberOverflow,

    // === Dispatch events ===
    /// A message was accepted by `AsyncBridge::take`.
    ///
    /// Sets: `message`, `message_id`, `attempt` (number of destinations).
    DispatchAccepted,

    /// Every destination reached a terminal state and the envelope was resolved.
    ///
    /// Sets: `message`, `message_id`, `reason` (only when at least one destination failed).
    EnvelopeResolved,

    // === Attempt events ===
    /// A delivery attempt is starting.
    ///
    /// Sets: `message`, `message_id`, `destination`, `attempt` (1-based, per destination).
    DeliveryStarting,

    /// The attempt succeeded; the destination's sequence is complete.
    ///
    /// Sets: `message`, `message_id`, `destination`, `attempt`.
    DeliverySucceeded,

    /// The attempt failed.
    ///
    /// Sets: `message`, `message_id`, `destination`, `attempt`, `reason`.
    DeliveryFailed,

    /// The attempt exceeded the per-attempt timeout (always followed by `DeliveryFailed`).
    ///
    /// Sets: `message`, `message_id`, `destination`, `attempt`, `timeout_ms`.
    TimeoutHit,

    /// Another attempt is scheduled after a fixed delay.
    ///
    /// Sets: `message`, `message_id`, `destination`, `attempt` (the failed one), `delay_ms`, `reason`.
    RetryScheduled,

    // === Terminal events ===
    /// The destination used its whole attempt budget without success.
    ///
    /// Sets: `message`, `message_id`, `destination`, `attempt`, `reason` (last error).
    DestinationExhausted,

    /// The dispatch was cancelled before the destination reached a terminal state.
    ///
    /// Sets: `message`, `message_id`, `destination`, `attempt` (attempts started so far).
    DeliveryCanceled,
}

/// Lifecycle event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Message name.
    pub message: Option<Arc<str>>,
    /// Message identifier.
    pub message_id: Option<Uuid>,
    /// Destination name.
    pub destination: Option<Arc<str>>,
    /// Subscriber name (subscriber events only).
    pub subscriber: Option<&'static str>,
    /// Attempt count (starting from 1).
    pub attempt: Option<u32>,
    /// Delay before the next attempt in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Attempt timeout in milliseconds (compact).
    pub timeout_ms: Option<u32>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            message: None,
            message_id: None,
            destination: None,
            subscriber: None,
            attempt: None,
            delay_ms: None,
            timeout_ms: None,
            reason: None,
        }
    }

    /// Attaches message name and id.
    #[inline]
    pub fn with_message(mut self, message: &Message) -> Self {
        self.message = Some(Arc::from(message.name()));
        self.message_id = Some(message.uuid());
        self
    }

    /// Attaches a destination name.
    #[inline]
    pub fn with_destination(mut self, destination: impl Into<Arc<str>>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// Attaches an attempt count.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a retry delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay_ms = Some(compact_ms(d));
        self
    }

    /// Attaches an attempt timeout (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        self.timeout_ms = Some(compact_ms(d));
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        let mut ev = Event::new(EventKind::SubscriberOverflow).with_reason(reason);
        ev.subscriber = Some(subscriber);
        ev
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        let mut ev = Event::new(EventKind::SubscriberPanicked).with_reason(info);
        ev.subscriber = Some(subscriber);
        ev
    }
}

fn compact_ms(d: Duration) -> u32 {
    d.as_millis().min(u128::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_monotonic() {
        let a = Event::new(EventKind::DeliveryStarting);
        let b = Event::new(EventKind::DeliveryStarting);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_with_message_sets_name_and_id() {
        let msg = Message::new("orders.created").unwrap();
        let ev = Event::new(EventKind::DispatchAccepted).with_message(&msg);
        assert_eq!(ev.message.as_deref(), Some("orders.created"));
        assert_eq!(ev.message_id, Some(msg.uuid()));
    }

    #[test]
    fn test_durations_saturate() {
        let ev = Event::new(EventKind::TimeoutHit).with_timeout(Duration::from_secs(u64::MAX));
        assert_eq!(ev.timeout_ms, Some(u32::MAX));
    }

    #[test]
    fn test_subscriber_events() {
        let ev = Event::subscriber_overflow("audit", "full");
        assert_eq!(ev.kind, EventKind::SubscriberOverflow);
        assert_eq!(ev.subscriber, Some("audit"));
        assert_eq!(ev.destination, None);
    }
}
