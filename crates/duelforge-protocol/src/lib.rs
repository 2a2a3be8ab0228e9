//! Wire protocol for duelforge.
//!
//! This crate defines what clients and the server say to each other:
//!
//! - **Messages** ([`ClientMessage`], [`ServerMessage`], [`BattleResult`])
//!   are the `{ type, payload }` frames.
//! - **Values** ([`Card`], [`RoomCode`], [`Seat`], [`Winner`],
//!   [`ErrorCode`], [`Recipient`]) travel inside them.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) turns frames
//!   into bytes and back.
//!
//! ```text
//! Transport (bytes) → Protocol (ClientMessage) → Room (state machine)
//! ```

mod card;
mod codec;
mod error;
mod message;
mod types;

pub use card::Card;
pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use message::{BattleResult, ClientMessage, ServerMessage};
pub use types::{ErrorCode, Recipient, RoomCode, Seat, Winner};
