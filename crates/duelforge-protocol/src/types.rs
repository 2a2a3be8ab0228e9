//! Identity and addressing types shared by every layer.
//!
//! These are the small value types that show up inside messages: the
//! room code players read out to each other, the two seat roles, round
//! outcomes, and the fixed set of error codes.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RoomCode
// ---------------------------------------------------------------------------

/// A short, human-shareable room identifier such as `"K3Q9ZD"`.
///
/// Codes are normalised on the way in (surrounding whitespace trimmed,
/// letters upper-cased) so a code typed as `" k3q9zd"` finds the same
/// room. On the wire a `RoomCode` is a plain JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RoomCode(String);

impl RoomCode {
    /// Builds a code from any string, normalising it.
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_ascii_uppercase())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RoomCode {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl From<&str> for RoomCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<RoomCode> for String {
    fn from(code: RoomCode) -> Self {
        code.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Seat
// ---------------------------------------------------------------------------

/// One of the two fixed roles in a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seat {
    /// The player who created the room.
    Host,
    /// The player who joined it.
    Guest,
}

impl Seat {
    /// Returns the seat across the table.
    pub fn opponent(self) -> Self {
        match self {
            Self::Host => Self::Guest,
            Self::Guest => Self::Host,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host => f.write_str("host"),
            Self::Guest => f.write_str("guest"),
        }
    }
}

// ---------------------------------------------------------------------------
// Winner
// ---------------------------------------------------------------------------

/// The outcome of one resolved round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Host,
    Guest,
    Draw,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host => f.write_str("host"),
            Self::Guest => f.write_str("guest"),
            Self::Draw => f.write_str("draw"),
        }
    }
}

// ---------------------------------------------------------------------------
// ErrorCode
// ---------------------------------------------------------------------------

/// The error codes a client can receive in an `error` message.
///
/// Serialized as a bare snake_case string, e.g. `"room_full"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// `join_room` named a code that no live room has.
    RoomNotFound,
    /// `join_room` targeted a room whose guest seat is taken.
    RoomFull,
    /// The other seat's connection closed; the room is gone.
    OpponentDisconnected,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoomNotFound => f.write_str("room_not_found"),
            Self::RoomFull => f.write_str("room_full"),
            Self::OpponentDisconnected => f.write_str("opponent_disconnected"),
        }
    }
}

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// Specifies which seat of a room should receive a server message.
///
/// Room operations return `(Recipient, ServerMessage)` pairs; the room
/// resolves each recipient to its current peers when dispatching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Send to one seat.
    Seat(Seat),
    /// Send to the seat opposite the given one.
    OpponentOf(Seat),
}
