//! # LogWriter: tracing-backed event renderer
//!
//! A subscriber that turns every [`Event`] into a structured `tracing` record under the
//! `eventbridge` target. Install any `tracing` subscriber (e.g. `tracing-subscriber`'s
//! `fmt` with an `EnvFilter`) to see the output.
//!
//! ## Levels
//! - `debug`: attempt starting / succeeded, dispatch accepted
//! - `info`: envelope resolved successfully
//! - `warn`: attempt failed, timeout, retry scheduled, cancellation, subscriber overflow
//! - `error`: destination exhausted, failed envelope, subscriber panic

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let name = e.message.as_deref().unwrap_or("-");
        let id = e.message_id.map(|id| id.to_string()).unwrap_or_default();
        let destination = e.destination.as_deref().unwrap_or("-");
        let attempt = e.attempt.unwrap_or(0);
        let reason = e.reason.as_deref().unwrap_or("");

        match e.kind {
            EventKind::DispatchAccepted => {
                tracing::debug!(target: "eventbridge", name, id = %id, destinations = attempt, "dispatch accepted");
            }
            EventKind::DeliveryStarting => {
                tracing::debug!(target: "eventbridge", name, id = %id, destination, attempt, "delivery starting");
            }
            EventKind::DeliverySucceeded => {
                tracing::debug!(target: "eventbridge", name, id = %id, destination, attempt, "delivered");
            }
            EventKind::DeliveryFailed => {
                tracing::warn!(target: "eventbridge", name, id = %id, destination, attempt, reason, "delivery failed");
            }
            EventKind::TimeoutHit => {
                tracing::warn!(target: "eventbridge", name, id = %id, destination, attempt, timeout_ms = e.timeout_ms, "delivery timed out");
            }
            EventKind::RetryScheduled => {
                tracing::warn!(target: "eventbridge", name, id = %id, destination, after_attempt = attempt, delay_ms = e.delay_ms, reason, "retry scheduled");
            }
            EventKind::DestinationExhausted => {
                tracing::error!(target: "eventbridge", name, id = %id, destination, attempts = attempt, reason, "destination exhausted");
            }
            EventKind::DeliveryCanceled => {
                tracing::warn!(target: "eventbridge", name, id = %id, destination, attempts = attempt, "delivery cancelled");
            }
            EventKind::EnvelopeResolved if e.reason.is_some() => {
                tracing::error!(target: "eventbridge", name, id = %id, reason, "envelope resolved with failures");
            }
            EventKind::EnvelopeResolved => {
                tracing::info!(target: "eventbridge", name, id = %id, "envelope resolved");
            }
            EventKind::SubscriberOverflow => {
                tracing::warn!(target: "eventbridge", subscriber = e.subscriber, reason, "subscriber overflow");
            }
            EventKind::SubscriberPanicked => {
                tracing::error!(target: "eventbridge", subscriber = e.subscriber, reason, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
