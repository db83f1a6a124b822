//! # Destination traits.
//!
//! A destination is anything that can attempt to deliver one [`Message`] and report
//! success or failure. It is called once per attempt and may be called again for the
//! same message; idempotency of the side effect is the destination's concern.
//!
//! Async destinations receive a [`CancellationToken`] and should return promptly once
//! it is cancelled.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{error::DeliveryError, message::Message};

/// Shared handle to a destination.
pub type DestinationRef = Arc<dyn Destination>;

/// # Asynchronous, cancelable delivery target.
///
/// Any returned error, whatever its variant, is treated by the async engine as a
/// retryable failure signal. The sequence ends early only when the dispatch token is
/// cancelled or the destination panics.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use eventbridge::{Destination, DeliveryError, Message};
///
/// struct Stdout;
///
/// #[async_trait]
/// impl Destination for Stdout {
///     fn name(&self) -> &str { "stdout" }
///
///     async fn deliver(&self, ctx: CancellationToken, message: Arc<Message>) -> Result<(), DeliveryError> {
///         if ctx.is_cancelled() {
///             return Err(DeliveryError::Canceled);
///         }
///         println!("{} {}", message.name(), message.uuid());
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Destination: Send + Sync + 'static {
    /// Returns a stable, human-readable destination name.
    fn name(&self) -> &str;

    /// Attempts one delivery of `message`.
    async fn deliver(
        &self,
        ctx: CancellationToken,
        message: Arc<Message>,
    ) -> Result<(), DeliveryError>;
}

/// # Blocking, single-shot delivery target.
///
/// The error type is the destination's own; the [`SyncBridge`](crate::SyncBridge)
/// returns it to the caller unchanged.
pub trait SyncDestination {
    /// Error reported by a failed delivery.
    type Error;

    /// Delivers `message`, blocking the calling thread until done.
    fn deliver(&self, message: &Message) -> Result<(), Self::Error>;
}

impl<D> SyncDestination for Arc<D>
where
    D: SyncDestination + ?Sized,
{
    type Error = D::Error;

    fn deliver(&self, message: &Message) -> Result<(), Self::Error> {
        (**self).deliver(message)
    }
}
