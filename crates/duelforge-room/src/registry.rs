//! Room registry: mints room codes and owns every live room.

use std::collections::HashMap;

use duelforge_protocol::RoomCode;
use rand::Rng;

use crate::config::CODE_ALPHABET;
use crate::peer::Peer;
use crate::{Room, RoomConfig, RoomError};

/// Draws before the registry asks its [`CodeSource`] for longer codes.
pub const MAX_CODE_DRAWS: usize = 32;

/// Times a crowded registry may lengthen its codes before giving up.
const MAX_LENGTHENINGS: usize = 4;

/// Produces candidate room codes.
///
/// The registry redraws on collision, up to [`MAX_CODE_DRAWS`] times,
/// then calls [`lengthen`](CodeSource::lengthen) and tries again. Tests
/// plug in a closure returning fixed codes.
pub trait CodeSource: Send + 'static {
    fn next_code(&mut self) -> RoomCode;

    /// Switches to longer codes. Returns `false` if this source can't.
    fn lengthen(&mut self) -> bool {
        false
    }
}

/// Uniform random codes over [`CODE_ALPHABET`].
#[derive(Debug, Clone)]
pub struct RandomCodes {
    length: usize,
}

impl RandomCodes {
    pub fn new(length: usize) -> Self {
        Self {
            length: length.max(1),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl CodeSource for RandomCodes {
    fn next_code(&mut self) -> RoomCode {
        let mut rng = rand::rng();
        let code: String = (0..self.length)
            .map(|_| char::from(CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())]))
            .collect();
        RoomCode::new(code)
    }

    fn lengthen(&mut self) -> bool {
        self.length += 1;
        true
    }
}

impl<F> CodeSource for F
where
    F: FnMut() -> RoomCode + Send + 'static,
{
    fn next_code(&mut self) -> RoomCode {
        self()
    }
}

/// Every live room, keyed by code.
///
/// A room exists here from `create_room` until the router removes it on
/// disconnect. Codes are unique among live rooms but may be reused once a
/// room is gone; each room also gets a serial number that is never reused.
pub struct RoomRegistry<P> {
    rooms: HashMap<RoomCode, Room<P>>,
    codes: Box<dyn CodeSource>,
    next_serial: u64,
}

impl<P: Peer> RoomRegistry<P> {
    /// Creates an empty registry drawing random codes of
    /// `config.code_length` characters, but never fewer than
    /// [`MIN_CODE_LENGTH`](crate::MIN_CODE_LENGTH).
    pub fn new(config: RoomConfig) -> Self {
        Self::with_code_source(RandomCodes::new(config.effective_code_length()))
    }

    /// Creates an empty registry drawing codes from `codes`.
    pub fn with_code_source(codes: impl CodeSource) -> Self {
        Self {
            rooms: HashMap::new(),
            codes: Box::new(codes),
            next_serial: 1,
        }
    }

    /// Creates a room with `host` in the host seat and returns its code
    /// and serial.
    ///
    /// # Errors
    /// [`RoomError::CodesExhausted`] if no free code turned up within the
    /// draw budget. No room is created.
    pub fn create_room(&mut self, host: P) -> Result<(RoomCode, u64), RoomError> {
        let code = self.free_code()?;

        let serial = self.next_serial;
        self.next_serial += 1;
        self.rooms
            .insert(code.clone(), Room::new(code.clone(), serial, host));
        tracing::info!(room = %code, serial, "room created");
        Ok((code, serial))
    }

    /// Draws until a code no live room uses turns up, lengthening codes
    /// whenever a batch of draws all collide.
    fn free_code(&mut self) -> Result<RoomCode, RoomError> {
        let mut draws = 0;
        for _ in 0..=MAX_LENGTHENINGS {
            for _ in 0..MAX_CODE_DRAWS {
                draws += 1;
                let candidate = self.codes.next_code();
                if !self.rooms.contains_key(&candidate) {
                    return Ok(candidate);
                }
                tracing::debug!(room = %candidate, "room code collision, redrawing");
            }
            if !self.codes.lengthen() {
                break;
            }
            tracing::warn!(rooms = self.rooms.len(), "room codes crowded, lengthening");
        }
        Err(RoomError::CodesExhausted(draws))
    }

    pub fn get(&self, code: &RoomCode) -> Option<&Room<P>> {
        self.rooms.get(code)
    }

    pub fn get_mut(&mut self, code: &RoomCode) -> Option<&mut Room<P>> {
        self.rooms.get_mut(code)
    }

    /// Looks up `code`, but only if it still names the room with `serial`.
    pub fn find_mut(
        &mut self,
        code: &RoomCode,
        serial: u64,
    ) -> Option<&mut Room<P>> {
        self.rooms
            .get_mut(code)
            .filter(|room| room.serial() == serial)
    }

    /// Removes `code`, but only if it still names the room with `serial`.
    /// A later room that reused the code stays put.
    pub fn remove_if_serial(
        &mut self,
        code: &RoomCode,
        serial: u64,
    ) -> Option<Room<P>> {
        self.rooms.get(code).filter(|room| room.serial() == serial)?;
        self.remove(code)
    }

    /// Removes a room. Removing an unknown code is a no-op.
    pub fn remove(&mut self, code: &RoomCode) -> Option<Room<P>> {
        let room = self.rooms.remove(code);
        if room.is_some() {
            tracing::info!(room = %code, "room removed");
        }
        room
    }

    pub fn contains(&self, code: &RoomCode) -> bool {
        self.rooms.contains_key(code)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Codes of all live rooms, in no particular order.
    pub fn room_codes(&self) -> Vec<RoomCode> {
        self.rooms.keys().cloned().collect()
    }
}

impl<P: Peer> Default for RoomRegistry<P> {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}
