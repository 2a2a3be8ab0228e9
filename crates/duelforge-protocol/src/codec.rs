//! Codec trait and the JSON implementation.
//!
//! The router decodes inbound frames and the connection handler encodes
//! outbound messages through a [`Codec`], so neither depends on the
//! concrete format.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Converts messages to and from raw frame bytes.
///
/// `Send + Sync + 'static` because one codec value is shared by the
/// dispatcher task and every connection handler task.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`). This is what browsers
/// speak, and the only codec the server ships with.
///
/// ## Example
///
/// ```rust
/// use duelforge_protocol::{ClientMessage, Codec, JsonCodec};
///
/// let codec = JsonCodec;
/// let msg: ClientMessage = codec.decode(br#"{"type":"create_room"}"#).unwrap();
/// assert_eq!(msg, ClientMessage::CreateRoom);
///
/// let bytes = codec.encode(&msg).unwrap();
/// assert_eq!(bytes, br#"{"type":"create_room"}"#);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClientMessage, ErrorCode, ServerMessage};

    #[test]
    fn test_decode_garbage_returns_decode_error() {
        let result: Result<ClientMessage, _> = JsonCodec.decode(b"not json at all");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_truncated_frame_returns_error() {
        let result: Result<ClientMessage, _> =
            JsonCodec.decode(br#"{"type":"join_room","payload":{"roomId":"AB"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_encode_produces_utf8_text() {
        let bytes = JsonCodec
            .encode(&ServerMessage::Error(ErrorCode::RoomNotFound))
            .unwrap();
        let text = String::from_utf8(bytes).expect("JSON is UTF-8");
        assert_eq!(text, r#"{"type":"error","payload":"room_not_found"}"#);
    }
}
