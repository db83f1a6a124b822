//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`] fan-out used to
//! observe dispatch lifecycle events off the delivery path.
//!
//! ## Architecture
//! ```text
//! DeliveryActor ── publish(Event) ──► Bus ──► listener ──► SubscriberSet::emit
//!                                                              │
//!                                                   ┌──────────┼──────────┐
//!                                                   ▼          ▼          ▼
//!                                               [queue S1] [queue S2] [queue SN]
//!                                                   │          │          │
//!                                               on_event() on_event() on_event()
//! ```
//!
//! ## Built-in subscribers
//! - `LogWriter` (feature `logging`): renders events as `tracing` records.

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscriber;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub(crate) use set::panic_message;
pub use set::SubscriberSet;
pub use subscriber::Subscribe;
