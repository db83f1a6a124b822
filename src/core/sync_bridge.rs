//! # SyncBridge: blocking single-destination delivery.
//!
//! The minimal counterpart of [`AsyncBridge`](crate::AsyncBridge): one destination,
//! one call to `deliver` per `take`, no retry, no events. The caller's thread is blocked
//! for the whole attempt and receives the destination's error unchanged.

use crate::{destinations::SyncDestination, message::Message};

/// Delivers messages to a single destination, synchronously.
///
/// ## Example
/// ```rust
/// use eventbridge::{Message, SyncBridge, SyncDestination};
///
/// struct Reject;
///
/// impl SyncDestination for Reject {
///     type Error = &'static str;
///
///     fn deliver(&self, _message: &Message) -> Result<(), Self::Error> {
///         Err("rejected")
///     }
/// }
///
/// let bridge = SyncBridge::new(Reject);
/// assert_eq!(bridge.take(&Message::new("orders.created").unwrap()), Err("rejected"));
/// ```
#[derive(Debug, Clone)]
pub struct SyncBridge<D> {
    destination: D,
}

impl<D: SyncDestination> SyncBridge<D> {
    /// Creates a bridge over `destination`.
    pub fn new(destination: D) -> Self {
        Self { destination }
    }

    /// Delivers `message` exactly once and returns the destination's result verbatim.
    pub fn take(&self, message: &Message) -> Result<(), D::Error> {
        self.destination.deliver(message)
    }

    /// The configured destination.
    pub fn destination(&self) -> &D {
        &self.destination
    }
}
