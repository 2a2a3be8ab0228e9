//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding frames.
///
/// Decode failures on inbound frames are never reported back to the
/// client; the router logs them at debug level and drops the frame.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust value into bytes).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, an unknown `type`, or a
    /// payload missing required fields.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
