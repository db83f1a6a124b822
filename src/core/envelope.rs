//! # Envelope: write-once handle on a dispatch outcome.
//!
//! [`take`](crate::AsyncBridge::take) returns an [`Envelope`] immediately; the dispatch
//! coordinator holds the matching [`Resolver`] and resolves it exactly once, after every
//! destination reached a terminal state.
//!
//! ```text
//! take() ──► channel() ──► (Resolver, Envelope)
//!               │                      │  clone() ─► waiter 2
//!               ▼                      │  clone() ─► waiter N
//!   coordinator.resolve(outcome) ──► watch ──► every waiter sees the same outcome
//! ```
//!
//! ## Rules
//! - `Resolver::resolve` consumes the resolver, so a second resolution cannot be expressed;
//!   the slot is additionally only written while empty.
//! - A resolver dropped without resolving turns into [`DispatchError::Abandoned`] for waiters.
//! - Waiting never consumes the outcome; any number of handles may wait, before or after resolution.

use std::future::IntoFuture;

use futures::future::BoxFuture;
use tokio::sync::watch;
use uuid::Uuid;

use crate::error::DispatchError;

type Outcome = Result<(), DispatchError>;

/// Creates a connected resolver/envelope pair for the message `message_id`.
pub(crate) fn channel(message_id: Uuid) -> (Resolver, Envelope) {
    let (tx, rx) = watch::channel(None);
    (Resolver { tx }, Envelope { message_id, rx })
}

/// Producer side of an envelope. Exactly one exists per dispatch.
pub(crate) struct Resolver {
    tx: watch::Sender<Option<Outcome>>,
}

impl Resolver {
    /// Publishes the terminal outcome to every waiter.
    pub(crate) fn resolve(self, outcome: Outcome) {
        let written = self.tx.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(outcome);
            true
        });
        debug_assert!(written, "envelope resolved twice");
    }
}

/// Awaitable, clonable handle on the outcome of one asynchronous dispatch.
///
/// Resolves with `Ok(())` only if every destination accepted the message.
///
/// ```rust
/// # async fn demo(bridge: eventbridge::AsyncBridge) -> Result<(), Box<dyn std::error::Error>> {
/// use tokio_util::sync::CancellationToken;
/// use eventbridge::Message;
///
/// let envelope = bridge.take(&CancellationToken::new(), Message::new("orders.created")?);
/// let observer = envelope.clone();
///
/// envelope.wait().await?;          // explicit
/// assert!(observer.await.is_ok()); // or via IntoFuture
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Envelope {
    message_id: Uuid,
    rx: watch::Receiver<Option<Outcome>>,
}

impl Envelope {
    /// Identifier of the dispatched message.
    pub fn message_id(&self) -> Uuid {
        self.message_id
    }

    /// Waits until the dispatch is resolved and returns its outcome.
    pub async fn wait(&self) -> Result<(), DispatchError> {
        let mut rx = self.rx.clone();
        match rx.wait_for(Option::is_some).await {
            Ok(slot) => (*slot).clone().unwrap_or(Err(DispatchError::Abandoned)),
            Err(_closed) => Err(DispatchError::Abandoned),
        }
    }

    /// Blocks the current thread until the dispatch is resolved.
    ///
    /// Intended for synchronous callers; must not be called from inside an async task.
    pub fn wait_blocking(&self) -> Result<(), DispatchError> {
        futures::executor::block_on(self.wait())
    }

    /// Returns the outcome if already resolved, without waiting.
    pub fn try_outcome(&self) -> Option<Result<(), DispatchError>> {
        self.rx.borrow().clone()
    }

    /// True once the outcome is available.
    pub fn is_resolved(&self) -> bool {
        self.rx.borrow().is_some()
    }
}

impl IntoFuture for Envelope {
    type Output = Result<(), DispatchError>;
    type IntoFuture = BoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move { self.wait().await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DeliveryError, DestinationFailure};

    fn undelivered() -> DispatchError {
        DispatchError::Undelivered {
            total: 1,
            failures: vec![DestinationFailure {
                destination: "queue".into(),
                attempts: 3,
                error: DeliveryError::failed("down"),
            }],
        }
    }

    #[tokio::test]
    async fn test_all_waiters_observe_same_outcome() {
        let (resolver, envelope) = channel(Uuid::now_v7());
        let early = envelope.clone();
        let waiter = tokio::spawn(async move { early.wait().await });

        assert!(!envelope.is_resolved());
        assert_eq!(envelope.try_outcome(), None);

        resolver.resolve(Err(undelivered()));

        assert_eq!(waiter.await.unwrap(), Err(undelivered()));
        assert_eq!(envelope.wait().await, Err(undelivered()));
        assert_eq!(envelope.clone().await, Err(undelivered()));
        assert_eq!(envelope.try_outcome(), Some(Err(undelivered())));
    }

    #[tokio::test]
    async fn test_wait_after_resolution_returns_immediately() {
        let (resolver, envelope) = channel(Uuid::now_v7());
        resolver.resolve(Ok(()));
        assert!(envelope.is_resolved());
        assert_eq!(envelope.wait().await, Ok(()));
    }

    #[tokio::test]
    async fn test_dropped_resolver_abandons_envelope() {
        let (resolver, envelope) = channel(Uuid::now_v7());
        drop(resolver);
        assert_eq!(envelope.wait().await, Err(DispatchError::Abandoned));
    }

    #[test]
    fn test_wait_blocking_from_plain_thread() {
        let (resolver, envelope) = channel(Uuid::now_v7());
        let handle = std::thread::spawn(move || envelope.wait_blocking());
        resolver.resolve(Ok(()));
        assert_eq!(handle.join().unwrap(), Ok(()));
    }
}
