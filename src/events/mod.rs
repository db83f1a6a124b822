//! Lifecycle events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `AsyncBridge::take` coordinator, `DeliveryActor`, `runner::run_once`,
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the listener spawned by `AsyncBridgeBuilder::build` (fans out to
//!   `SubscriberSet`) and receivers from `AsyncBridge::subscribe`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
