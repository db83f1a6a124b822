//! # DeliveryActor: one destination's retry sequence.
//!
//! Drives delivery of one [`Message`] to one destination with:
//! - bounded attempts and a fixed wait per [`RetryPolicy`],
//! - optional per-attempt timeout,
//! - cooperative cancellation via [`CancellationToken`].
//!
//! ## State machine
//! ```text
//! Pending ──► Attempting ──► Ok ─────────────────────────────► Terminal(Success)
//!                 ▲    │
//!                 │    ├──► Err ──► retry.next(attempt)
//!                 │    │              ├─ Some(wait) ─► RetryWait ──┐
//!                 │    │              └─ None ───────► Terminal(Failure, last error)
//!                 │    └──► panic ──────────────────► Terminal(Failure, Panicked)
//!                 └────────────────────────────────────────────────┘
//!
//! Cancellation of the dispatch token at any point (before an attempt, during it,
//! during RetryWait) ─► Terminal(Failure, Canceled)
//! ```
//!
//! ## Rules
//! - Attempts run **sequentially** within one actor; attempt N+1 starts only after
//!   attempt N returned and the wait elapsed.
//! - The attempt counter and last error are local to the actor and never shared.
//! - Actors of the same dispatch never wait on each other.
//! - Every error the destination returns is retried while attempts remain, including a
//!   returned `Canceled` or `Panicked`; cancellation is decided by the token alone.

use std::sync::Arc;
use std::time::Duration;

use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::{
    core::runner::{AttemptError, attempt_event, run_once},
    destinations::DestinationRef,
    error::{DeliveryError, DestinationFailure},
    events::{Bus, EventKind},
    message::Message,
    policies::RetryPolicy,
};

/// Parameters of a retry sequence, extracted from [`Config`](crate::Config).
#[derive(Clone, Copy, Debug)]
pub(crate) struct DeliveryParams {
    /// Attempt budget and fixed wait.
    pub retry: RetryPolicy,
    /// Optional per-attempt timeout (`None` = no timeout).
    pub timeout: Option<Duration>,
}

/// Terminal state of one destination's sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DestinationOutcome {
    /// The destination accepted the message on attempt `attempts`.
    Delivered { attempts: u32 },
    /// The destination never accepted the message.
    Failed(DestinationFailure),
}

/// Runs the retry sequence for a single destination.
pub(crate) struct DeliveryActor {
    destination: DestinationRef,
    message: Arc<Message>,
    params: DeliveryParams,
    bus: Bus,
}

impl DeliveryActor {
    /// Creates a new delivery actor.
    pub(crate) fn new(
        destination: DestinationRef,
        message: Arc<Message>,
        params: DeliveryParams,
        bus: Bus,
    ) -> Self {
        Self {
            destination,
            message,
            params,
            bus,
        }
    }

    /// Runs until success, attempt exhaustion or cancellation of `token`.
    pub(crate) async fn run(self, token: CancellationToken) -> DestinationOutcome {
        let mut attempt: u32 = 0;

        loop {
            if token.is_cancelled() {
                return self.canceled(attempt);
            }

            attempt += 1;
            self.bus.publish(attempt_event(
                EventKind::DeliveryStarting,
                self.destination.name(),
                &self.message,
                attempt,
            ));

            let err = match run_once(
                self.destination.as_ref(),
                &self.message,
                &token,
                self.params.timeout,
                attempt,
                &self.bus,
            )
            .await
            {
                Ok(()) => return DestinationOutcome::Delivered { attempts: attempt },
                Err(AttemptError::Canceled) => return self.canceled(attempt),
                Err(panicked @ AttemptError::Panicked(_)) => {
                    return self.exhausted(attempt, panicked.into_delivery_error());
                }
                Err(AttemptError::Failed(_)) if token.is_cancelled() => {
                    return self.canceled(attempt);
                }
                Err(AttemptError::Failed(e)) => e,
            };

            let Some(wait) = self.params.retry.next(attempt) else {
                return self.exhausted(attempt, err);
            };

            self.bus.publish(
                attempt_event(
                    EventKind::RetryScheduled,
                    self.destination.name(),
                    &self.message,
                    attempt,
                )
                .with_delay(wait)
                .with_reason(err.to_string()),
            );

            let sleep = time::sleep(wait);
            tokio::pin!(sleep);
            select! {
                _ = &mut sleep => {}
                _ = token.cancelled() => { return self.canceled(attempt); }
            }
        }
    }

    fn exhausted(&self, attempts: u32, error: DeliveryError) -> DestinationOutcome {
        self.bus.publish(
            attempt_event(
                EventKind::DestinationExhausted,
                self.destination.name(),
                &self.message,
                attempts,
            )
            .with_reason(error.to_string()),
        );
        self.failed(attempts, error)
    }

    fn canceled(&self, attempts: u32) -> DestinationOutcome {
        self.bus.publish(attempt_event(
            EventKind::DeliveryCanceled,
            self.destination.name(),
            &self.message,
            attempts,
        ));
        self.failed(attempts, DeliveryError::Canceled)
    }

    fn failed(&self, attempts: u32, error: DeliveryError) -> DestinationOutcome {
        DestinationOutcome::Failed(DestinationFailure {
            destination: self.destination.name().to_string(),
            attempts,
            error,
        })
    }
}
