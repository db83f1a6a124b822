//! # eventbridge
//!
//! **eventbridge** hands typed, validated events to one or more delivery targets.
//!
//! A [`Message`] (name, opaque payload, uuid + UTC timestamp) is delivered either
//! synchronously through a [`SyncBridge`] (one destination, blocking, no retry) or
//! concurrently through an [`AsyncBridge`] (many destinations, each with its own bounded
//! fixed-delay retry sequence). Asynchronous dispatch returns an [`Envelope`], a
//! write-once handle that resolves once every destination reached a terminal state.
//!
//! ## Architecture
//! ```text
//!                  Message::new("orders.created")
//!                               │
//!                               ▼
//!            AsyncBridge::take(ctx, message) ──► Envelope (returned immediately)
//!                               │                    ▲
//!        ┌──────────────────────┼──────────────────┐ │
//!        ▼                      ▼                  ▼ │
//! ┌──────────────┐      ┌──────────────┐   ┌──────────────┐
//! │DeliveryActor │      │DeliveryActor │   │DeliveryActor │
//! │ (dest A)     │      │ (dest B)     │   │ (dest N)     │
//! │ retry loop   │      │ retry loop   │   │ retry loop   │
//! └──────┬───────┘      └──────┬───────┘   └──────┬───────┘
//!        │ terminal outcome    │                  │
//!        └─────────────────────┴────────┬─────────┘
//!                                       ▼
//!                          coordinator ──► resolve(Envelope)
//!
//! Every step publishes an Event on the bridge Bus ──► SubscriberSet ──► Subscribe impls
//! ```
//!
//! ### Retry sequence (per destination)
//! ```text
//! loop {
//!   ├─► attempt += 1, publish DeliveryStarting
//!   ├─► run_once(destination, timeout)
//!   │       ├─ Ok  ──► DeliverySucceeded, done
//!   │       └─ Err ──► DeliveryFailed
//!   │                  ├─ attempts left ─► RetryScheduled, sleep(wait_between) (cancellable)
//!   │                  └─ budget spent  ─► DestinationExhausted, done (failure)
//!   └─ cancellation at any point ─► DeliveryCanceled, done (failure)
//! }
//! ```
//!
//! ## Features
//! | Area               | Description                                                     | Key types / traits                         |
//! |--------------------|-----------------------------------------------------------------|--------------------------------------------|
//! | **Messages**       | Validated event values and their JSON wire envelope.            | [`Message`], [`WireEnvelope`], [`Payload`] |
//! | **Destinations**   | Capability traits for delivery targets.                         | [`Destination`], [`SyncDestination`]       |
//! | **Dispatch**       | Sync and async bridges, awaitable outcome.                      | [`SyncBridge`], [`AsyncBridge`], [`Envelope`] |
//! | **Policies**       | Attempt budget and fixed retry delay.                           | [`RetryPolicy`]                            |
//! | **Errors**         | Typed errors for messages, attempts and dispatches.             | [`MessageError`], [`DeliveryError`], [`DispatchError`] |
//! | **Observability**  | Lifecycle events and subscribers.                               | [`Event`], [`Subscribe`]                   |
//! | **Configuration**  | Centralized dispatch settings.                                  | [`Config`]                                 |
//!
//! ## Optional features
//! - `logging`: exports [`LogWriter`], a subscriber rendering events through `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use eventbridge::{AsyncBridge, Config, DeliveryError, DestinationFn, DestinationRef, Json, Message};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let audit: DestinationRef = DestinationFn::arc("audit", |_ctx: CancellationToken, msg: Arc<Message>| async move {
//!         println!("audit {} {}", msg.name(), msg.uuid());
//!         Ok::<(), DeliveryError>(())
//!     });
//!
//!     let bridge = AsyncBridge::builder(Config::with_retry(3, Duration::from_millis(200)))
//!         .with_destination(audit)
//!         .build();
//!
//!     let message = Message::with_payload("orders.created", &Json::new(vec![101u32, 102]))?;
//!     bridge.take(&CancellationToken::new(), message).wait().await?;
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod destinations;
mod error;
mod events;
mod message;
mod policies;
mod subscribers;

// ---- Public re-exports ----

pub use config::Config;
pub use crate::core::{AsyncBridge, AsyncBridgeBuilder, Envelope, SyncBridge};
pub use destinations::{Destination, DestinationFn, DestinationRef, SyncDestination};
pub use error::{DeliveryError, DestinationFailure, DispatchError, MessageError};
pub use events::{Bus, Event, EventKind};
pub use message::{Json, Message, MessageMeta, Payload, WireEnvelope, WireMeta, validate_name};
pub use policies::RetryPolicy;
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a tracing-backed logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
