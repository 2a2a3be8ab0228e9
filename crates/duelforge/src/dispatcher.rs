//! The single task that owns all room state.
//!
//! Connection handlers never touch rooms directly. They turn socket
//! activity into [`RouterEvent`]s and push them onto one bounded channel;
//! the dispatcher pops them in order and applies each to the
//! [`SessionRouter`] before looking at the next. That ordering is what
//! makes a room's two pending slots safe without any locks.

use duelforge_protocol::{Codec, JsonCodec};
use duelforge_room::{PeerSender, SessionRouter};
use duelforge_transport::ConnectionId;
use tokio::sync::mpsc;

/// Something that happened on a connection, in arrival order.
#[derive(Debug)]
pub(crate) enum RouterEvent {
    /// A socket finished its handshake. `peer` is the sending half of its
    /// outbound channel.
    Connected {
        conn_id: ConnectionId,
        peer: PeerSender,
    },
    /// One inbound frame, still encoded.
    Frame {
        conn_id: ConnectionId,
        frame: Vec<u8>,
    },
    /// The socket is gone. Always the last event for a connection.
    Closed { conn_id: ConnectionId },
}

pub(crate) struct Dispatcher<C = JsonCodec> {
    router: SessionRouter<PeerSender, C>,
    events: mpsc::Receiver<RouterEvent>,
}

impl<C: Codec> Dispatcher<C> {
    /// Spawns the dispatcher task and returns the sender handlers use to
    /// reach it. The task ends once every sender has been dropped.
    pub(crate) fn spawn(
        router: SessionRouter<PeerSender, C>,
        buffer: usize,
    ) -> mpsc::Sender<RouterEvent> {
        let (tx, events) = mpsc::channel(buffer);
        let dispatcher = Self { router, events };
        tokio::spawn(dispatcher.run());
        tx
    }

    async fn run(mut self) {
        tracing::debug!("dispatcher started");
        while let Some(event) = self.events.recv().await {
            self.handle(event);
        }
        tracing::debug!(
            rooms = self.router.registry().room_count(),
            "dispatcher stopped"
        );
    }

    fn handle(&mut self, event: RouterEvent) {
        match event {
            RouterEvent::Connected { conn_id, peer } => {
                self.router.connect(conn_id, peer);
            }
            RouterEvent::Frame { conn_id, frame } => {
                self.router.handle_frame(conn_id, &frame);
            }
            RouterEvent::Closed { conn_id } => {
                self.router.disconnect(conn_id);
            }
        }
    }
}
