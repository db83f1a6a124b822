//! Dispatch core: bridges, envelopes and retry sequences.
//!
//! Public API from this module: [`AsyncBridge`], [`AsyncBridgeBuilder`], [`Envelope`]
//! and [`SyncBridge`].
//!
//! Internal modules:
//! - [`runner`]: executes one attempt with timeout/cancellation and event publishing;
//! - [`actor`]: runs one destination's retry sequence;
//! - [`envelope`]: write-once outcome cell shared by the coordinator and waiters;
//! - [`async_bridge`]: spawns actors and resolves the envelope;
//! - [`builder`]: wires subscribers to the bridge's event bus.

mod actor;
mod async_bridge;
mod builder;
mod envelope;
mod runner;
mod sync_bridge;

pub use async_bridge::AsyncBridge;
pub use builder::AsyncBridgeBuilder;
pub use envelope::Envelope;
pub use sync_bridge::SyncBridge;

#[cfg(test)]
mod testing;
