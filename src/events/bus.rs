//! # Event bus for dispatch lifecycle events.
//!
//! [`Bus`] wraps [`tokio::sync::broadcast`]: every delivery actor of every dispatch
//! publishes into the same bus, and any number of receivers observe it.
//!
//! ```text
//! Publishers (many):                    Receivers:
//!   DeliveryActor (dest A) ──┐
//!   DeliveryActor (dest B) ──┼──► Bus ──► builder listener ──► SubscriberSet
//!   dispatch coordinator ────┘       └──► AsyncBridge::subscribe() receivers
//! ```
//!
//! ## Rules
//! - `publish()` never blocks and never fails; with no receivers the event is dropped.
//! - Capacity is shared; a receiver that falls behind gets `RecvError::Lagged(n)`.
//! - No persistence.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for lifecycle events. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus; `capacity` is clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all current receivers.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a receiver observing events sent from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}
