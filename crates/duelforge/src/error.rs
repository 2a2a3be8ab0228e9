//! Unified error type for the duelforge server.

use duelforge_protocol::ProtocolError;
use duelforge_room::RoomError;
use duelforge_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant generates `From` impls, so `?`
/// converts sub-crate errors automatically at the server boundary.
#[derive(Debug, thiserror::Error)]
pub enum DuelError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (full, not found, invalid state).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// The dispatcher task has stopped, so no further events can be
    /// delivered.
    #[error("dispatcher stopped")]
    DispatcherStopped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "gone");
        let err = TransportError::AcceptFailed(io);
        let duel_err: DuelError = err.into();
        assert!(matches!(duel_err, DuelError::Transport(_)));
        assert!(duel_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ProtocolError::Decode(json_err);
        let duel_err: DuelError = err.into();
        assert!(matches!(duel_err, DuelError::Protocol(_)));
    }

    #[test]
    fn test_from_room_error() {
        let err = RoomError::NotFound(duelforge_protocol::RoomCode::new("ABC123"));
        let duel_err: DuelError = err.into();
        assert!(matches!(duel_err, DuelError::Room(_)));
        assert_eq!(duel_err.to_string(), "room ABC123 not found");
    }
}
