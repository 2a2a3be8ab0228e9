//! Session routing: which connection sits in which seat of which room.
//!
//! The router is the only place inbound client messages turn into room
//! operations. It is a plain synchronous struct; the server drives it
//! from a single task, so every event is handled to completion before
//! the next one starts and rooms need no locking.

use std::collections::HashMap;

use duelforge_protocol::{Card, ClientMessage, Codec, JsonCodec, RoomCode, Seat, ServerMessage};
use duelforge_transport::ConnectionId;

use crate::peer::{Peer, deliver};
use crate::{RoomConfig, RoomError, RoomRegistry};

/// Where a connection is seated.
///
/// `serial` pins the assignment to one specific room. If that room is
/// torn down and its code later reused, the old assignment no longer
/// matches and is treated as stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub room: RoomCode,
    pub seat: Seat,
    pub serial: u64,
}

struct Link<P> {
    peer: P,
    assignment: Option<Assignment>,
}

/// Routes decoded client messages from connections to rooms, and
/// connection closures to room teardown.
pub struct SessionRouter<P, C = JsonCodec> {
    registry: RoomRegistry<P>,
    links: HashMap<ConnectionId, Link<P>>,
    codec: C,
}

impl<P: Peer> SessionRouter<P> {
    /// Creates a router with an empty registry and the JSON codec.
    pub fn new(config: RoomConfig) -> Self {
        Self::with_parts(RoomRegistry::new(config), JsonCodec)
    }
}

impl<P: Peer, C: Codec> SessionRouter<P, C> {
    pub fn with_parts(registry: RoomRegistry<P>, codec: C) -> Self {
        Self {
            registry,
            links: HashMap::new(),
            codec,
        }
    }

    /// Registers a new connection with no seat.
    pub fn connect(&mut self, conn_id: ConnectionId, peer: P) {
        let previous = self.links.insert(
            conn_id,
            Link {
                peer,
                assignment: None,
            },
        );
        if previous.is_some() {
            tracing::warn!(%conn_id, "connection registered twice, replacing");
        }
        tracing::debug!(%conn_id, "connection registered");
    }

    /// Decodes one inbound frame and handles it.
    ///
    /// Frames that don't decode to a known message are dropped with no
    /// reply.
    pub fn handle_frame(&mut self, conn_id: ConnectionId, frame: &[u8]) {
        match self.codec.decode::<ClientMessage>(frame) {
            Ok(msg) => self.handle_message(conn_id, msg),
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "dropping undecodable frame");
            }
        }
    }

    /// Handles a decoded client message.
    pub fn handle_message(&mut self, conn_id: ConnectionId, msg: ClientMessage) {
        if !self.links.contains_key(&conn_id) {
            tracing::debug!(%conn_id, "message from unregistered connection");
            return;
        }

        match msg {
            ClientMessage::CreateRoom => self.create_room(conn_id),
            ClientMessage::JoinRoom { room_id } => self.join_room(conn_id, room_id),
            ClientMessage::PlayCard {
                room_id,
                from,
                card,
            } => self.play_card(conn_id, room_id, from, card),
        }
    }

    /// Forgets a connection. If it was seated in a live room, that room is
    /// closed, the other seat is notified, and the room is removed.
    pub fn disconnect(&mut self, conn_id: ConnectionId) {
        let Some(link) = self.links.remove(&conn_id) else {
            return;
        };
        tracing::debug!(%conn_id, "connection unregistered");

        let Some(assignment) = link.assignment else {
            return;
        };
        let Some(mut room) = self
            .registry
            .remove_if_serial(&assignment.room, assignment.serial)
        else {
            return;
        };

        let outbound = room.handle_disconnect(assignment.seat);
        room.dispatch(outbound);
    }

    /// The connection's current seat, if it is seated in a live room.
    pub fn assignment(&self, conn_id: ConnectionId) -> Option<&Assignment> {
        let assignment = self.links.get(&conn_id)?.assignment.as_ref()?;
        self.registry
            .get(&assignment.room)
            .filter(|room| room.serial() == assignment.serial)
            .map(|_| assignment)
    }

    pub fn registry(&self) -> &RoomRegistry<P> {
        &self.registry
    }

    pub fn connection_count(&self) -> usize {
        self.links.len()
    }

    fn create_room(&mut self, conn_id: ConnectionId) {
        if self.is_seated(conn_id) {
            tracing::debug!(%conn_id, "already seated, ignoring create_room");
            return;
        }
        let Some(link) = self.links.get_mut(&conn_id) else {
            return;
        };

        let (room, serial) = match self.registry.create_room(link.peer.clone()) {
            Ok(created) => created,
            Err(e) => {
                tracing::warn!(%conn_id, error = %e, "create_room dropped");
                return;
            }
        };
        link.assignment = Some(Assignment {
            room: room.clone(),
            seat: Seat::Host,
            serial,
        });
        tracing::info!(%conn_id, room = %room, "host seated");
        deliver(&link.peer, ServerMessage::RoomCreated { room_id: room });
    }

    fn join_room(&mut self, conn_id: ConnectionId, code: RoomCode) {
        if self.is_seated(conn_id) {
            tracing::debug!(%conn_id, "already seated, ignoring join_room");
            return;
        }
        let Some(link) = self.links.get_mut(&conn_id) else {
            return;
        };

        let Some(room) = self.registry.get_mut(&code) else {
            reject(&link.peer, conn_id, RoomError::NotFound(code));
            return;
        };

        match room.join(link.peer.clone()) {
            Ok(outbound) => {
                link.assignment = Some(Assignment {
                    room: code,
                    seat: Seat::Guest,
                    serial: room.serial(),
                });
                room.dispatch(outbound);
            }
            Err(e) => reject(&link.peer, conn_id, e),
        }
    }

    fn play_card(
        &mut self,
        conn_id: ConnectionId,
        claimed_room: Option<RoomCode>,
        claimed_seat: Option<Seat>,
        card: Card,
    ) {
        let Some(assignment) = self.assignment(conn_id).cloned() else {
            tracing::debug!(%conn_id, "play_card from unseated connection");
            return;
        };

        if claimed_room.is_some_and(|r| r != assignment.room)
            || claimed_seat.is_some_and(|s| s != assignment.seat)
        {
            tracing::debug!(
                %conn_id,
                room = %assignment.room,
                seat = %assignment.seat,
                "play_card claims a different seat; using assigned seat"
            );
        }

        let Some(room) = self
            .registry
            .find_mut(&assignment.room, assignment.serial)
        else {
            return;
        };

        match room.submit_action(assignment.seat, card) {
            Ok(outbound) => room.dispatch(outbound),
            Err(e) => tracing::debug!(%conn_id, error = %e, "play_card dropped"),
        }
    }

    /// Returns `true` if the connection holds a seat in a live room.
    /// A stale assignment is cleared along the way.
    fn is_seated(&mut self, conn_id: ConnectionId) -> bool {
        if self.assignment(conn_id).is_some() {
            return true;
        }
        if let Some(link) = self.links.get_mut(&conn_id) {
            if link.assignment.take().is_some() {
                tracing::debug!(%conn_id, "cleared stale assignment");
            }
        }
        false
    }
}

/// Tells the client about a failed join, or just logs it if the error has
/// no wire form.
fn reject<P: Peer>(peer: &P, conn_id: ConnectionId, err: RoomError) {
    match err.wire_code() {
        Some(wire) => {
            tracing::debug!(%conn_id, error = %err, "join rejected");
            deliver(peer, ServerMessage::Error(wire));
        }
        None => tracing::debug!(%conn_id, error = %err, "join dropped"),
    }
}
