//! Error types for the room layer.

use duelforge_protocol::{ErrorCode, RoomCode};

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No live room has this code.
    #[error("room {0} not found")]
    NotFound(RoomCode),

    /// The guest seat is already taken.
    #[error("room {0} is full")]
    RoomFull(RoomCode),

    /// The room is in a state that doesn't allow this operation, e.g. a
    /// card played before a guest has joined.
    #[error("invalid room state for this operation: {0}")]
    InvalidState(String),

    /// Every candidate code drawn collided with a live room, even after
    /// lengthening the codes.
    #[error("no free room code after {0} draws")]
    CodesExhausted(usize),
}

impl RoomError {
    /// The code to send the client, if this error is one clients see.
    ///
    /// `InvalidState` and `CodesExhausted` have no wire representation;
    /// the router logs and drops them.
    pub fn wire_code(&self) -> Option<ErrorCode> {
        match self {
            Self::NotFound(_) => Some(ErrorCode::RoomNotFound),
            Self::RoomFull(_) => Some(ErrorCode::RoomFull),
            Self::InvalidState(_) | Self::CodesExhausted(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_codes() {
        let code = RoomCode::new("ABC123");
        assert_eq!(
            RoomError::NotFound(code.clone()).wire_code(),
            Some(ErrorCode::RoomNotFound)
        );
        assert_eq!(
            RoomError::RoomFull(code).wire_code(),
            Some(ErrorCode::RoomFull)
        );
        assert_eq!(RoomError::InvalidState("x".into()).wire_code(), None);
        assert_eq!(RoomError::CodesExhausted(32).wire_code(), None);
    }

    #[test]
    fn test_display_names_the_room() {
        let err = RoomError::RoomFull(RoomCode::new("ABC123"));
        assert_eq!(err.to_string(), "room ABC123 is full");
    }
}
