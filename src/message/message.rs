//! # Message: the immutable event value.
//!
//! A [`Message`] carries a validated name, opaque payload bytes and generated metadata.
//! Construction is the only way to obtain one, so every message in memory satisfies:
//! - the name matches `<namespace>.<event>`,
//! - the uuid is a freshly generated (or wire-validated) non-nil UUID,
//! - the timestamp is in UTC.
//!
//! ## Example
//! ```rust
//! use eventbridge::{Json, Message};
//!
//! let msg = Message::with_payload("orders.created", &Json::new(vec![1, 2, 3])).unwrap();
//! assert_eq!(msg.name(), "orders.created");
//!
//! let mut items: Json<Vec<u8>> = Json::empty();
//! msg.payload(&mut items).unwrap();
//! assert_eq!(items.into_inner(), Some(vec![1, 2, 3]));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::MessageError,
    message::{name::validate_name, payload::Payload, wire, wire::WireEnvelope},
};

/// Generated metadata of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageMeta {
    uuid: Uuid,
    timestamp: DateTime<Utc>,
}

impl MessageMeta {
    fn generate() -> Self {
        Self {
            uuid: Uuid::now_v7(),
            timestamp: Utc::now(),
        }
    }

    pub(crate) fn from_parts(uuid: Uuid, timestamp: DateTime<Utc>) -> Self {
        Self { uuid, timestamp }
    }

    /// Unique identifier.
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Creation time (UTC).
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Immutable event value.
///
/// Serializes to (and deserializes from) the wire envelope, so a `Message` can be
/// embedded directly in other serde documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "WireEnvelope", try_from = "WireEnvelope")]
pub struct Message {
    name: String,
    payload: Vec<u8>,
    meta: MessageMeta,
}

impl Message {
    /// Creates a message without payload.
    ///
    /// Fails with [`MessageError::InvalidName`] if `name` is not `<namespace>.<event>`.
    pub fn new(name: impl Into<String>) -> Result<Self, MessageError> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            name,
            payload: Vec::new(),
            meta: MessageMeta::generate(),
        })
    }

    /// Creates a message whose payload is produced by `payload`'s encoder.
    ///
    /// The name is validated before the encoder runs.
    pub fn with_payload<P>(name: impl Into<String>, payload: &P) -> Result<Self, MessageError>
    where
        P: Payload + ?Sized,
    {
        let mut message = Self::new(name)?;
        message.payload = payload
            .encode_payload()
            .map_err(|error| MessageError::EncodingFailed { error })?;
        Ok(message)
    }

    pub(crate) fn from_parts(name: String, payload: Vec<u8>, meta: MessageMeta) -> Self {
        Self {
            name,
            payload,
            meta,
        }
    }

    /// Event name, e.g. `orders.created`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw payload bytes (empty when no payload was supplied).
    pub fn payload_bytes(&self) -> &[u8] {
        &self.payload
    }

    /// Decodes the stored payload into `target`.
    pub fn payload<P>(&self, target: &mut P) -> Result<(), MessageError>
    where
        P: Payload + ?Sized,
    {
        target
            .decode_payload(&self.payload)
            .map_err(|error| MessageError::DecodingFailed { error })
    }

    /// Message metadata.
    pub fn meta(&self) -> &MessageMeta {
        &self.meta
    }

    /// Shorthand for `meta().uuid()`.
    pub fn uuid(&self) -> Uuid {
        self.meta.uuid
    }

    /// Shorthand for `meta().timestamp()`.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.meta.timestamp
    }

    /// Encodes the message as a JSON wire envelope.
    pub fn to_wire_bytes(&self) -> Result<Vec<u8>, MessageError> {
        serde_json::to_vec(&WireEnvelope::from(self)).map_err(|e| {
            MessageError::MalformedEnvelope {
                error: e.to_string(),
            }
        })
    }

    /// Decodes and validates a JSON wire envelope.
    ///
    /// The uuid and timestamp are taken from the wire, not regenerated.
    pub fn from_wire_bytes(bytes: &[u8]) -> Result<Self, MessageError> {
        wire::decode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Json;

    struct Broken;

    impl Payload for Broken {
        fn encode_payload(&self) -> Result<Vec<u8>, String> {
            Err("cannot encode".into())
        }

        fn decode_payload(&mut self, _bytes: &[u8]) -> Result<(), String> {
            Err("cannot decode".into())
        }
    }

    #[test]
    fn test_new_generates_metadata() {
        let before = Utc::now();
        let msg = Message::new("orders.created").unwrap();
        let after = Utc::now();

        assert_eq!(msg.name(), "orders.created");
        assert!(msg.payload_bytes().is_empty());
        assert!(!msg.uuid().is_nil());
        assert!(msg.timestamp() >= before && msg.timestamp() <= after);
    }

    #[test]
    fn test_each_message_gets_its_own_uuid() {
        let a = Message::new("test.test").unwrap();
        let b = Message::new("test.test").unwrap();
        assert_ne!(a.uuid(), b.uuid());
    }

    #[test]
    fn test_invalid_name_rejected_before_encoding() {
        let err = Message::with_payload("test", &Broken).unwrap_err();
        assert_eq!(
            err,
            MessageError::InvalidName {
                name: "test".into()
            }
        );
    }

    #[test]
    fn test_encoding_failure_surfaces() {
        let err = Message::with_payload("test.test", &Broken).unwrap_err();
        assert_eq!(
            err,
            MessageError::EncodingFailed {
                error: "cannot encode".into()
            }
        );
    }

    #[test]
    fn test_decoding_failure_surfaces() {
        let msg = Message::new("test.test").unwrap();
        let err = msg.payload(&mut Broken).unwrap_err();
        assert_eq!(err.as_label(), "message_decoding_failed");
    }

    #[test]
    fn test_payload_round_trip_through_codec() {
        let msg = Message::with_payload("users.renamed", &Json::new("alice".to_string())).unwrap();
        assert_eq!(msg.payload_bytes(), br#""alice""#);

        let mut name: Json<String> = Json::empty();
        msg.payload(&mut name).unwrap();
        assert_eq!(name.into_inner().as_deref(), Some("alice"));
    }
}
