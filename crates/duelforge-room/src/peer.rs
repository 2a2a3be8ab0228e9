//! The outbound capability a room holds for each seat.
//!
//! Rooms never see sockets. They hold a [`Peer`]: something that can
//! take a [`ServerMessage`] and say whether anyone is still listening.
//! The server's peer is the sending half of a per-connection channel,
//! drained into the socket by that connection's handler task.

use duelforge_protocol::ServerMessage;
use tokio::sync::mpsc;

/// A fire-and-forget handle for delivering messages to one connection.
///
/// `send` must not block and must not fail loudly: if the other end is
/// gone the message is dropped.
pub trait Peer: Clone + Send + 'static {
    /// Queues a message for delivery.
    fn send(&self, msg: ServerMessage);

    /// Returns `true` while the connection behind this peer can still
    /// receive.
    fn is_open(&self) -> bool;
}

/// The peer type the server uses: one unbounded channel per connection.
pub type PeerSender = mpsc::UnboundedSender<ServerMessage>;

impl Peer for mpsc::UnboundedSender<ServerMessage> {
    fn send(&self, msg: ServerMessage) {
        // Err only means the receiver was dropped, i.e. the socket closed.
        let _ = mpsc::UnboundedSender::send(self, msg);
    }

    fn is_open(&self) -> bool {
        !self.is_closed()
    }
}

/// Sends `msg` to `peer` if it is still open; otherwise does nothing.
pub(crate) fn deliver<P: Peer>(peer: &P, msg: ServerMessage) {
    if peer.is_open() {
        peer.send(msg);
    }
}
