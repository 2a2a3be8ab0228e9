//! Rooms, the registry that owns them, and the router that seats
//! connections in them.
//!
//! Everything here is synchronous and single-owner. The server runs one
//! [`SessionRouter`] inside one task and feeds it connection events in
//! arrival order, so each event finishes before the next begins.
//!
//! # Key types
//!
//! - [`SessionRouter`]: turns client messages into room operations
//! - [`RoomRegistry`]: mints room codes and owns live rooms
//! - [`Room`]: one duel, its seats, and its pending cards
//! - [`Peer`]: how a room reaches a seated connection
//! - [`RoomState`]: lifecycle state machine

mod config;
mod error;
mod logic;
mod peer;
mod registry;
mod room;
mod router;

pub use config::{CODE_ALPHABET, MIN_CODE_LENGTH, RoomConfig, RoomState};
pub use error::RoomError;
pub use logic::{Round, resolve};
pub use peer::{Peer, PeerSender};
pub use registry::{CodeSource, MAX_CODE_DRAWS, RandomCodes, RoomRegistry};
pub use room::{Outbound, Room};
pub use router::{Assignment, SessionRouter};
