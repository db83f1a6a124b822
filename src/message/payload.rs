//! # Payload codec capability.
//!
//! The core never looks inside payload bytes. A caller hands in a [`Payload`] when
//! building a message ([`Message::with_payload`](crate::Message::with_payload)) and again
//! when reading it back ([`Message::payload`](crate::Message::payload)).
//!
//! [`Json`] covers the common case of a serde type encoded as JSON.

use serde::{Serialize, de::DeserializeOwned};

/// Caller-supplied encoder/decoder for message payloads.
///
/// Errors are reported as plain strings; the message layer wraps them into
/// `EncodingFailed` / `DecodingFailed`.
///
/// # Example
/// ```
/// use eventbridge::Payload;
///
/// #[derive(Default)]
/// struct Counter(u32);
///
/// impl Payload for Counter {
///     fn encode_payload(&self) -> Result<Vec<u8>, String> {
///         Ok(self.0.to_be_bytes().to_vec())
///     }
///
///     fn decode_payload(&mut self, bytes: &[u8]) -> Result<(), String> {
///         let raw: [u8; 4] = bytes.try_into().map_err(|_| "expected 4 bytes".to_string())?;
///         self.0 = u32::from_be_bytes(raw);
///         Ok(())
///     }
/// }
/// ```
pub trait Payload {
    /// Produces the payload bytes.
    fn encode_payload(&self) -> Result<Vec<u8>, String>;

    /// Populates `self` from payload bytes.
    fn decode_payload(&mut self, bytes: &[u8]) -> Result<(), String>;
}

/// JSON payload codec for any serde type.
///
/// Decoding into a `Json<T>` replaces its value; use [`Json::default`] (for `T: Default`)
/// or [`Json::empty`] as the decode target.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Json<T>(pub Option<T>);

impl<T> Json<T> {
    /// Wraps a value for encoding.
    pub fn new(value: T) -> Self {
        Self(Some(value))
    }

    /// Empty decode target.
    pub fn empty() -> Self {
        Self(None)
    }

    /// Returns the decoded value, if any.
    pub fn into_inner(self) -> Option<T> {
        self.0
    }
}

impl<T> Payload for Json<T>
where
    T: Serialize + DeserializeOwned,
{
    fn encode_payload(&self) -> Result<Vec<u8>, String> {
        serde_json::to_vec(&self.0).map_err(|e| e.to_string())
    }

    fn decode_payload(&mut self, bytes: &[u8]) -> Result<(), String> {
        self.0 = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Order {
        id: u64,
        sku: String,
    }

    #[test]
    fn test_json_encodes_inner_value() {
        let order = Json::new(Order {
            id: 7,
            sku: "abc".into(),
        });
        let bytes = order.encode_payload().unwrap();
        assert_eq!(bytes, br#"{"id":7,"sku":"abc"}"#);
    }

    #[test]
    fn test_json_decode_into_empty_target() {
        let mut target: Json<Order> = Json::empty();
        target.decode_payload(br#"{"id":1,"sku":"x"}"#).unwrap();
        assert_eq!(
            target.into_inner(),
            Some(Order {
                id: 1,
                sku: "x".into()
            })
        );
    }

    #[test]
    fn test_json_decode_reports_error() {
        let mut target: Json<Order> = Json::empty();
        assert!(target.decode_payload(b"not json").is_err());
    }
}
