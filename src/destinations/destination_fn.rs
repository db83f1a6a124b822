//! # Function-backed destination (`DestinationFn`)
//!
//! [`DestinationFn`] wraps a closure `F: Fn(CancellationToken, Arc<Message>) -> Fut`,
//! producing a fresh future per attempt. There is no hidden state shared between
//! attempts; if a destination needs state, capture an `Arc<...>` explicitly.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use eventbridge::{DestinationFn, DestinationRef, DeliveryError, Message};
//!
//! let d: DestinationRef = DestinationFn::arc("audit", |_ctx: CancellationToken, msg: Arc<Message>| async move {
//!     if msg.payload_bytes().is_empty() {
//!         return Err(DeliveryError::failed("empty payload"));
//!     }
//!     Ok(())
//! });
//!
//! assert_eq!(d.name(), "audit");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{destinations::destination::Destination, error::DeliveryError, message::Message};

/// Function-backed destination implementation.
#[derive(Debug)]
pub struct DestinationFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> DestinationFn<F> {
    /// Creates a new function-backed destination.
    ///
    /// Prefer [`DestinationFn::arc`] when you immediately need a [`DestinationRef`](crate::DestinationRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the destination and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Destination for DestinationFn<F>
where
    F: Fn(CancellationToken, Arc<Message>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), DeliveryError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn deliver(
        &self,
        ctx: CancellationToken,
        message: Arc<Message>,
    ) -> Result<(), DeliveryError> {
        (self.f)(ctx, message).await
    }
}
