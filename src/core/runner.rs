//! # Run a single delivery attempt.
//!
//! Executes one attempt of a [`Destination`] with optional timeout and publishes the
//! attempt's terminal event to the [`Bus`].
//!
//! ## Event flow
//! ```text
//! Success:      deliver() → Ok(())          → publish DeliverySucceeded
//! Failure:      deliver() → Err(e)          → publish DeliveryFailed
//! Timeout:      timeout exceeded → cancel child → publish TimeoutHit
//!                                             → publish DeliveryFailed (timeout)
//! Panic:        deliver() panics            → publish DeliveryFailed (panicked)
//! Cancellation: parent cancelled            → no event (the actor reports it)
//! ```
//!
//! Errors returned by the destination are passed through as [`AttemptError::Failed`]
//! whatever their variant; only the runner itself produces [`AttemptError::Canceled`]
//! and [`AttemptError::Panicked`].
//!
//! ## Rules
//! - Derives a **child token** per attempt; cancelling it never affects siblings.
//! - Parent cancellation wins over an in-flight delivery: the attempt future is dropped
//!   and `Canceled` is returned even if the destination ignores its token.
//! - A panic inside the destination is contained to this attempt.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::{
    destinations::Destination,
    error::DeliveryError,
    events::{Bus, Event, EventKind},
    message::Message,
    subscribers::panic_message,
};

/// Why a single attempt did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AttemptError {
    /// The dispatch token was cancelled while the attempt was in flight.
    Canceled,
    /// The destination panicked; the panic was caught here.
    Panicked(String),
    /// The destination returned an error, or the attempt timed out.
    Failed(DeliveryError),
}

impl AttemptError {
    /// The error recorded for the destination when this attempt is its last.
    pub(crate) fn into_delivery_error(self) -> DeliveryError {
        match self {
            AttemptError::Canceled => DeliveryError::Canceled,
            AttemptError::Panicked(error) => DeliveryError::Panicked { error },
            AttemptError::Failed(e) => e,
        }
    }
}

/// Executes a single attempt of delivering `message` to `destination`.
pub(crate) async fn run_once<D: Destination + ?Sized>(
    destination: &D,
    message: &Arc<Message>,
    parent: &CancellationToken,
    timeout: Option<Duration>,
    attempt: u32,
    bus: &Bus,
) -> Result<(), AttemptError> {
    let child = parent.child_token();

    let attempt_fut = async {
        let delivery = AssertUnwindSafe(destination.deliver(child.clone(), Arc::clone(message)))
            .catch_unwind()
            .map(|res| match res {
                Ok(returned) => returned.map_err(AttemptError::Failed),
                Err(panic) => Err(AttemptError::Panicked(panic_message(panic.as_ref()))),
            });

        match timeout.filter(|d| *d > Duration::ZERO) {
            Some(dur) => match time::timeout(dur, delivery).await {
                Ok(res) => res,
                Err(_elapsed) => {
                    child.cancel();
                    bus.publish(
                        attempt_event(EventKind::TimeoutHit, destination.name(), message, attempt)
                            .with_timeout(dur),
                    );
                    Err(AttemptError::Failed(DeliveryError::Timeout { timeout: dur }))
                }
            },
            None => delivery.await,
        }
    };

    let res = tokio::select! {
        biased;
        _ = parent.cancelled() => {
            child.cancel();
            Err(AttemptError::Canceled)
        }
        res = attempt_fut => res,
    };

    match &res {
        Ok(()) => {
            bus.publish(attempt_event(
                EventKind::DeliverySucceeded,
                destination.name(),
                message,
                attempt,
            ));
        }
        Err(AttemptError::Canceled) => {}
        Err(e) => {
            let reason = e.clone().into_delivery_error().to_string();
            bus.publish(
                attempt_event(EventKind::DeliveryFailed, destination.name(), message, attempt)
                    .with_reason(reason),
            );
        }
    }
    res
}

/// Builds an event describing one attempt of one destination.
pub(crate) fn attempt_event(
    kind: EventKind,
    destination: &str,
    message: &Message,
    attempt: u32,
) -> Event {
    Event::new(kind)
        .with_message(message)
        .with_destination(destination)
        .with_attempt(attempt)
}
