//! Room configuration and state machine.

/// Characters room codes are drawn from. Upper-case only, so codes can be
/// read aloud and typed without worrying about case.
pub const CODE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Shortest room code the registry will mint. Shorter configured lengths
/// are raised to this.
pub const MIN_CODE_LENGTH: usize = 4;

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Configuration for room creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomConfig {
    /// Number of characters in a generated room code.
    ///
    /// Six characters over a 36-symbol alphabet gives about two billion
    /// codes, so a fresh draw almost never collides with a live room.
    /// Values below [`MIN_CODE_LENGTH`] are raised to it.
    pub code_length: usize,
}

impl RoomConfig {
    /// The code length the registry actually uses.
    pub fn effective_code_length(&self) -> usize {
        self.code_length.max(MIN_CODE_LENGTH)
    }
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self { code_length: 6 }
    }
}

// ---------------------------------------------------------------------------
// RoomState
// ---------------------------------------------------------------------------

/// The lifecycle state of a room.
///
/// ```text
/// AwaitingGuest ──join──→ Active ──disconnect──→ Closed
/// ```
///
/// - **AwaitingGuest**: only the host is seated; the room accepts one
///   `join`.
/// - **Active**: both seats filled; cards may be played.
/// - **Closed**: a seat disconnected. The room has been taken out of
///   the registry and only lives on long enough to notify the survivor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomState {
    AwaitingGuest,
    Active,
    Closed,
}

impl RoomState {
    /// Returns `true` if cards may be played.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Returns the next state along the only allowed path, or `None` from
    /// `Closed`.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::AwaitingGuest => Some(Self::Active),
            Self::Active => Some(Self::Closed),
            Self::Closed => None,
        }
    }

    /// Returns `true` if moving to `target` is a legal transition.
    ///
    /// A room may also close straight from `AwaitingGuest` when the host
    /// leaves before anyone joins.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
            || (self == Self::AwaitingGuest && target == Self::Closed)
    }
}

impl std::fmt::Display for RoomState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AwaitingGuest => write!(f, "AwaitingGuest"),
            Self::Active => write!(f, "Active"),
            Self::Closed => write!(f, "Closed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_state_next_follows_strict_order() {
        assert_eq!(RoomState::AwaitingGuest.next(), Some(RoomState::Active));
        assert_eq!(RoomState::Active.next(), Some(RoomState::Closed));
        assert_eq!(RoomState::Closed.next(), None);
    }

    #[test]
    fn test_room_state_never_returns_to_awaiting_guest() {
        assert!(!RoomState::Active.can_transition_to(RoomState::AwaitingGuest));
        assert!(!RoomState::Closed.can_transition_to(RoomState::AwaitingGuest));
        assert!(!RoomState::Closed.can_transition_to(RoomState::Active));
    }

    #[test]
    fn test_room_state_host_can_abandon_empty_room() {
        assert!(RoomState::AwaitingGuest.can_transition_to(RoomState::Closed));
    }

    #[test]
    fn test_room_state_predicates() {
        assert!(RoomState::Active.is_active());
        assert!(!RoomState::AwaitingGuest.is_active());
        assert!(!RoomState::Closed.is_active());
    }

    #[test]
    fn test_room_state_display() {
        assert_eq!(RoomState::AwaitingGuest.to_string(), "AwaitingGuest");
        assert_eq!(RoomState::Closed.to_string(), "Closed");
    }

    #[test]
    fn test_room_config_default() {
        assert_eq!(RoomConfig::default().code_length, 6);
    }

    #[test]
    fn test_short_code_lengths_are_raised_to_minimum() {
        assert_eq!(RoomConfig { code_length: 1 }.effective_code_length(), MIN_CODE_LENGTH);
        assert_eq!(RoomConfig { code_length: 0 }.effective_code_length(), MIN_CODE_LENGTH);
        assert_eq!(RoomConfig { code_length: 8 }.effective_code_length(), 8);
    }

    #[test]
    fn test_code_alphabet_is_upper_alphanumeric() {
        assert_eq!(CODE_ALPHABET.len(), 36);
        assert!(CODE_ALPHABET
            .iter()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }
}
