//! # Destination capabilities.
//!
//! This module provides the delivery-target abstractions:
//! - [`Destination`] - async, cancelable delivery used by the [`AsyncBridge`](crate::AsyncBridge)
//! - [`DestinationFn`] - closure-backed destination
//! - [`DestinationRef`] - shared reference to a destination (`Arc<dyn Destination>`)
//! - [`SyncDestination`] - blocking single-shot delivery used by the [`SyncBridge`](crate::SyncBridge)

mod destination;
mod destination_fn;

pub use destination::{Destination, DestinationRef, SyncDestination};
pub use destination_fn::DestinationFn;
