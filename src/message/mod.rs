//! # Message data model.
//!
//! This module provides the event value type and everything needed to move it across a transport:
//! - [`Message`] - immutable, validated event (name, opaque payload, uuid + UTC timestamp)
//! - [`Payload`] - caller-supplied codec turning a typed value into payload bytes and back
//! - [`Json`] - serde_json-backed [`Payload`] adapter
//! - [`WireEnvelope`] - serialized transport form of a message
//!
//! ## Lifecycle
//! ```text
//! Message::new / with_payload ──► Message ──► to_wire_bytes() ──► transport
//!                                    ▲                                │
//!                                    └──── from_wire_bytes() ◄────────┘
//!                                         (validated before promotion)
//! ```

mod message;
mod name;
mod payload;
mod wire;

pub use message::{Message, MessageMeta};
pub use name::validate_name;
pub use payload::{Json, Payload};
pub use wire::{WireEnvelope, WireMeta};
