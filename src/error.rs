//! Error types used by messages, destinations and the dispatch engine.
//!
//! This module defines three error enums:
//!
//! - [`MessageError`] — construction, codec and wire-envelope failures.
//! - [`DeliveryError`] — the outcome of a single failed delivery attempt.
//! - [`DispatchError`] — the terminal outcome carried by an [`Envelope`](crate::Envelope).
//!
//! All of them provide `as_label` for logging.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced while building, encoding or decoding a message.
///
/// These are always returned synchronously to the immediate caller and are never retried.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MessageError {
    /// The name does not match the `<namespace>.<event>` pattern.
    #[error("invalid message name {name:?}: expected <namespace>.<event>")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// The caller's payload codec failed to encode.
    #[error("payload encoding failed: {error}")]
    EncodingFailed {
        /// The underlying error message.
        error: String,
    },

    /// The caller's payload codec failed to decode the stored bytes.
    #[error("payload decoding failed: {error}")]
    DecodingFailed {
        /// The underlying error message.
        error: String,
    },

    /// The wire bytes could not be parsed into an envelope.
    #[error("malformed envelope: {error}")]
    MalformedEnvelope {
        /// The underlying parser error.
        error: String,
    },

    /// The envelope parsed, but a required field is missing or invalid.
    #[error("envelope validation failed on field `{field}`")]
    ValidationFailed {
        /// Dotted path of the offending field (e.g. `meta.uuid`).
        field: &'static str,
    },
}

impl MessageError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use eventbridge::MessageError;
    ///
    /// let err = MessageError::ValidationFailed { field: "meta.uuid" };
    /// assert_eq!(err.as_label(), "message_validation_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            MessageError::InvalidName { .. } => "message_invalid_name",
            MessageError::EncodingFailed { .. } => "message_encoding_failed",
            MessageError::DecodingFailed { .. } => "message_decoding_failed",
            MessageError::MalformedEnvelope { .. } => "message_malformed_envelope",
            MessageError::ValidationFailed { .. } => "message_validation_failed",
        }
    }
}

/// # Errors produced by a single delivery attempt.
///
/// Returned by [`Destination::deliver`](crate::Destination::deliver) and recorded by the
/// retry loop. Any variant returned by a destination is retried while attempts remain.
/// The engine itself records `Canceled` when the dispatch is cancelled and `Panicked`
/// when a destination panics; those end the sequence.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The destination rejected or failed the delivery; may succeed if retried.
    #[error("delivery failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },

    /// The attempt exceeded the configured per-attempt timeout.
    #[error("delivery timed out after {timeout:?}")]
    Timeout {
        /// The timeout that was exceeded.
        timeout: Duration,
    },

    /// The dispatch was cancelled before this destination reached a terminal state.
    ///
    /// A destination may also return it; the engine then treats it like any other failure.
    #[error("delivery cancelled")]
    Canceled,

    /// The destination panicked while delivering.
    #[error("destination panicked: {error}")]
    Panicked {
        /// Panic payload rendered as text.
        error: String,
    },
}

impl DeliveryError {
    /// Shorthand for [`DeliveryError::Failed`].
    ///
    /// # Example
    /// ```
    /// use eventbridge::DeliveryError;
    ///
    /// let err = DeliveryError::failed("connection refused");
    /// assert_eq!(err.to_string(), "delivery failed: connection refused");
    /// ```
    pub fn failed(error: impl std::fmt::Display) -> Self {
        DeliveryError::Failed {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            DeliveryError::Failed { .. } => "delivery_failed",
            DeliveryError::Timeout { .. } => "delivery_timeout",
            DeliveryError::Canceled => "delivery_canceled",
            DeliveryError::Panicked { .. } => "delivery_panicked",
        }
    }
}

/// Terminal failure of one destination's retry sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationFailure {
    /// Name reported by the destination.
    pub destination: String,
    /// Number of attempts that were started.
    pub attempts: u32,
    /// The last error observed.
    pub error: DeliveryError,
}

impl std::fmt::Display for DestinationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} after {} attempt(s): {}",
            self.destination, self.attempts, self.error
        )
    }
}

/// # Terminal error of an asynchronous dispatch.
///
/// Every waiter of the same [`Envelope`](crate::Envelope) observes an identical clone.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// At least one destination exhausted its attempts or was cancelled.
    #[error("{} of {total} destination(s) failed: {}", .failures.len(), render(.failures))]
    Undelivered {
        /// Number of destinations the message was dispatched to.
        total: usize,
        /// Failed destinations, in configuration order.
        failures: Vec<DestinationFailure>,
    },

    /// The engine stopped before resolving the envelope (runtime shut down).
    #[error("dispatch abandoned before resolution")]
    Abandoned,
}

fn render(failures: &[DestinationFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::Undelivered { .. } => "dispatch_undelivered",
            DispatchError::Abandoned => "dispatch_abandoned",
        }
    }

    /// Per-destination failures (empty for [`DispatchError::Abandoned`]).
    pub fn failures(&self) -> &[DestinationFailure] {
        match self {
            DispatchError::Undelivered { failures, .. } => failures,
            DispatchError::Abandoned => &[],
        }
    }

    /// Number of destinations that failed.
    pub fn failed_count(&self) -> usize {
        self.failures().len()
    }

    /// True when no destination received the message.
    pub fn all_failed(&self) -> bool {
        match self {
            DispatchError::Undelivered { total, failures } => failures.len() == *total,
            DispatchError::Abandoned => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(name: &str) -> DestinationFailure {
        DestinationFailure {
            destination: name.to_string(),
            attempts: 3,
            error: DeliveryError::failed("boom"),
        }
    }

    #[test]
    fn test_delivery_labels() {
        assert_eq!(DeliveryError::failed("x").as_label(), "delivery_failed");
        assert_eq!(
            DeliveryError::Timeout {
                timeout: Duration::from_secs(1)
            }
            .as_label(),
            "delivery_timeout"
        );
        assert_eq!(DeliveryError::Canceled.as_label(), "delivery_canceled");
        assert_eq!(
            DeliveryError::Panicked { error: "x".into() }.as_label(),
            "delivery_panicked"
        );
    }

    #[test]
    fn test_undelivered_counts() {
        let err = DispatchError::Undelivered {
            total: 2,
            failures: vec![failure("queue")],
        };
        assert_eq!(err.failed_count(), 1);
        assert!(!err.all_failed());

        let err = DispatchError::Undelivered {
            total: 1,
            failures: vec![failure("queue")],
        };
        assert!(err.all_failed());
    }

    #[test]
    fn test_undelivered_display_lists_destinations() {
        let err = DispatchError::Undelivered {
            total: 3,
            failures: vec![failure("a"), failure("b")],
        };
        let text = err.to_string();
        assert!(text.starts_with("2 of 3 destination(s) failed"));
        assert!(text.contains("a after 3 attempt(s): delivery failed: boom"));
        assert!(text.contains("; b after"));
    }
}
