//! # duelforge
//!
//! A server for two-seat, simultaneous-reveal card duels played over
//! WebSockets.
//!
//! One player creates a room and gets a short code; another joins with
//! that code. Each round both seats commit a card without seeing the
//! other's. When both are in, the stronger card wins and each seat is
//! told the outcome from its own point of view.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use duelforge::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), DuelError> {
//!     duelforge::init_tracing("info");
//!     let server = DuelServer::builder().bind("0.0.0.0:3000").build().await?;
//!     server.run().await
//! }
//! ```

mod dispatcher;
mod error;
mod handler;
mod logging;
mod server;

pub use error::DuelError;
pub use logging::init_tracing;
pub use server::{DEFAULT_EVENT_BUFFER, DuelServer, DuelServerBuilder};

/// Re-exports of the sub-crates.
pub use duelforge_protocol as protocol;
pub use duelforge_room as room;
pub use duelforge_transport as transport;

/// Everything needed to run a server or talk to one.
pub mod prelude {
    pub use crate::{DuelError, DuelServer, DuelServerBuilder, init_tracing};
    pub use duelforge_protocol::{
        BattleResult, Card, ClientMessage, Codec, ErrorCode, JsonCodec, RoomCode, Seat,
        ServerMessage, Winner,
    };
    pub use duelforge_room::{RoomConfig, RoomState};
}
