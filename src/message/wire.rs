//! # Wire envelope: the serialized transport form of a [`Message`].
//!
//! ```text
//! {
//!   "name": "orders.created",
//!   "payload": "<base64>",
//!   "meta": { "uuid": "<uuid>", "timestamp": "<RFC3339, UTC>" }
//! }
//! ```
//!
//! ## Decoding rules
//! Decoding runs in a fixed order so the same defect always yields the same error kind:
//! 1. bytes must be a JSON object, otherwise `MalformedEnvelope`;
//! 2. `name`, `meta`, `meta.uuid`, `meta.timestamp` must be present and non-null,
//!    otherwise `ValidationFailed` (checked before any type is inspected);
//! 3. fields must have the right JSON types and `payload` must be valid base64,
//!    otherwise `MalformedEnvelope`;
//! 4. name, uuid and timestamp must be valid, otherwise `ValidationFailed`.
//!
//! A missing or `null` payload decodes as empty bytes.

use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    error::MessageError,
    message::{
        message::{Message, MessageMeta},
        name::validate_name,
    },
};

/// Required fields, in the order they are checked.
const REQUIRED: [(&str, &[&str]); 4] = [
    ("name", &["name"]),
    ("meta", &["meta"]),
    ("meta.uuid", &["meta", "uuid"]),
    ("meta.timestamp", &["meta", "timestamp"]),
];

/// Serialized form of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireEnvelope {
    /// Event name.
    pub name: String,
    /// Payload bytes, base64 on the wire.
    #[serde(default, with = "base64_bytes")]
    pub payload: Vec<u8>,
    /// Message metadata.
    pub meta: WireMeta,
}

/// Serialized message metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMeta {
    /// Hyphenated UUID.
    pub uuid: String,
    /// RFC3339 timestamp.
    pub timestamp: String,
}

impl From<&Message> for WireEnvelope {
    fn from(message: &Message) -> Self {
        Self {
            name: message.name().to_string(),
            payload: message.payload_bytes().to_vec(),
            meta: WireMeta {
                uuid: message.uuid().hyphenated().to_string(),
                timestamp: message
                    .timestamp()
                    .to_rfc3339_opts(SecondsFormat::AutoSi, true),
            },
        }
    }
}

impl From<Message> for WireEnvelope {
    fn from(message: Message) -> Self {
        WireEnvelope::from(&message)
    }
}

impl TryFrom<WireEnvelope> for Message {
    type Error = MessageError;

    fn try_from(wire: WireEnvelope) -> Result<Self, Self::Error> {
        validate_name(&wire.name).map_err(|_| MessageError::ValidationFailed { field: "name" })?;

        let uuid = Uuid::parse_str(&wire.meta.uuid)
            .ok()
            .filter(|u| !u.is_nil())
            .ok_or(MessageError::ValidationFailed { field: "meta.uuid" })?;

        let timestamp = DateTime::parse_from_rfc3339(&wire.meta.timestamp)
            .map_err(|_| MessageError::ValidationFailed {
                field: "meta.timestamp",
            })?
            .with_timezone(&Utc);

        Ok(Message::from_parts(
            wire.name,
            wire.payload,
            MessageMeta::from_parts(uuid, timestamp),
        ))
    }
}

/// Parses, validates and promotes wire bytes to a [`Message`].
pub(crate) fn decode(bytes: &[u8]) -> Result<Message, MessageError> {
    let value: Value = serde_json::from_slice(bytes).map_err(malformed)?;
    if !value.is_object() {
        return Err(MessageError::MalformedEnvelope {
            error: "envelope must be a JSON object".to_string(),
        });
    }

    for (field, path) in REQUIRED {
        if lookup(&value, path).is_none() {
            return Err(MessageError::ValidationFailed { field });
        }
    }

    let wire: WireEnvelope = serde_json::from_value(value).map_err(malformed)?;
    Message::try_from(wire)
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |node, key| node.get(key))
        .filter(|v| !v.is_null())
}

fn malformed(err: serde_json::Error) -> MessageError {
    MessageError::MalformedEnvelope {
        error: err.to_string(),
    }
}

mod base64_bytes {
    use super::BASE64;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) => BASE64.decode(text.as_bytes()).map_err(D::Error::custom),
            None => Ok(Vec::new()),
        }
    }
}
