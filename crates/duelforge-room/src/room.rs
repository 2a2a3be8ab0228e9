//! A single two-seat duel.
//!
//! Room operations mutate state and return the messages the change
//! produces as `(Recipient, ServerMessage)` pairs. The caller hands those
//! back to [`Room::dispatch`], which resolves recipients to seated peers.
//! Keeping computation and delivery apart lets tests inspect the output
//! of an operation without any connections at all.

use duelforge_protocol::{Card, ErrorCode, Recipient, RoomCode, Seat, ServerMessage};

use crate::logic::Pending;
use crate::peer::{Peer, deliver};
use crate::{RoomError, RoomState};

/// Messages produced by one room operation, in delivery order.
pub type Outbound = Vec<(Recipient, ServerMessage)>;

/// A room: two seats, a pending card per seat, and a lifecycle state.
pub struct Room<P> {
    code: RoomCode,
    /// Registry-unique creation number. Distinguishes this room from a
    /// later one that happens to draw the same code.
    serial: u64,
    state: RoomState,
    host: P,
    guest: Option<P>,
    pending: Pending,
    rounds_played: u32,
}

impl<P: Peer> Room<P> {
    /// Creates a room with `host` seated and the guest seat empty.
    pub(crate) fn new(code: RoomCode, serial: u64, host: P) -> Self {
        Self {
            code,
            serial,
            state: RoomState::AwaitingGuest,
            host,
            guest: None,
            pending: Pending::default(),
            rounds_played: 0,
        }
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn state(&self) -> RoomState {
        self.state
    }

    /// Returns `true` once a guest has been seated.
    pub fn has_guest(&self) -> bool {
        self.guest.is_some()
    }

    /// The card `seat` has committed for the current round, if any.
    pub fn pending(&self, seat: Seat) -> Option<&Card> {
        self.pending.get(seat)
    }

    /// Number of rounds resolved so far.
    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// Seats `guest`.
    ///
    /// On success the guest is told `room_joined` and the host
    /// `guest_joined`, in that order.
    ///
    /// # Errors
    /// - [`RoomError::RoomFull`] if the guest seat is taken. The seated
    ///   guest is left in place.
    /// - [`RoomError::InvalidState`] if the room is closed.
    pub fn join(&mut self, guest: P) -> Result<Outbound, RoomError> {
        if self.guest.is_some() {
            return Err(RoomError::RoomFull(self.code.clone()));
        }
        self.transition_to(RoomState::Active)?;
        self.guest = Some(guest);
        tracing::info!(room = %self.code, "guest joined");

        Ok(vec![
            (
                Recipient::Seat(Seat::Guest),
                ServerMessage::RoomJoined {
                    room_id: self.code.clone(),
                },
            ),
            (Recipient::Seat(Seat::Host), ServerMessage::GuestJoined),
        ])
    }

    /// Commits `card` as `seat`'s action for the current round.
    ///
    /// An unresolved card already committed by the same seat is replaced.
    /// If the opponent has a card waiting too, the round resolves right
    /// here: both seats get their `battle_result` and both slots empty.
    /// Otherwise the opponent is told `opponent_played`, without the card.
    ///
    /// # Errors
    /// [`RoomError::InvalidState`] unless the room is `Active`.
    pub fn submit_action(
        &mut self,
        seat: Seat,
        card: Card,
    ) -> Result<Outbound, RoomError> {
        if !self.state.is_active() {
            return Err(RoomError::InvalidState(format!(
                "cannot play in room {} in state {}",
                self.code, self.state
            )));
        }

        if self.pending.set(seat, card).is_some() {
            tracing::debug!(
                room = %self.code,
                %seat,
                "replaced unresolved card"
            );
        }

        let Some(round) = self.pending.take_round() else {
            return Ok(vec![(
                Recipient::OpponentOf(seat),
                ServerMessage::OpponentPlayed,
            )]);
        };

        self.rounds_played += 1;
        tracing::info!(
            room = %self.code,
            round = self.rounds_played,
            winner = %round.winner,
            "round resolved"
        );

        Ok(vec![
            (
                Recipient::Seat(Seat::Host),
                ServerMessage::BattleResult(round.view(Seat::Host)),
            ),
            (
                Recipient::Seat(Seat::Guest),
                ServerMessage::BattleResult(round.view(Seat::Guest)),
            ),
        ])
    }

    /// Closes the room because `seat` disconnected.
    ///
    /// The other seat, if anyone is in it, is told
    /// `opponent_disconnected`. Removing the room from the registry is the
    /// caller's job.
    pub fn handle_disconnect(&mut self, seat: Seat) -> Outbound {
        if let Err(e) = self.transition_to(RoomState::Closed) {
            tracing::debug!(room = %self.code, error = %e, "room already closed");
        }
        tracing::info!(
            room = %self.code,
            %seat,
            rounds = self.rounds_played,
            "room closed after disconnect"
        );
        vec![(
            Recipient::OpponentOf(seat),
            ServerMessage::Error(ErrorCode::OpponentDisconnected),
        )]
    }

    /// Delivers outbound messages to the seats they address.
    ///
    /// Messages for an empty seat or a closed peer are dropped.
    pub fn dispatch(&self, outbound: Outbound) {
        for (recipient, msg) in outbound {
            match recipient {
                Recipient::Seat(seat) => self.send_to(seat, msg),
                Recipient::OpponentOf(seat) => self.send_to(seat.opponent(), msg),
            }
        }
    }

    /// Moves to `target` if the lifecycle allows it.
    fn transition_to(&mut self, target: RoomState) -> Result<(), RoomError> {
        if !self.state.can_transition_to(target) {
            return Err(RoomError::InvalidState(format!(
                "room {} cannot go from {} to {}",
                self.code, self.state, target
            )));
        }
        tracing::debug!(room = %self.code, from = %self.state, to = %target, "room state changed");
        self.state = target;
        Ok(())
    }

    fn peer(&self, seat: Seat) -> Option<&P> {
        match seat {
            Seat::Host => Some(&self.host),
            Seat::Guest => self.guest.as_ref(),
        }
    }

    /// Sends to a single seat. Silently drops if the seat is empty.
    fn send_to(&self, seat: Seat, msg: ServerMessage) {
        if let Some(peer) = self.peer(seat) {
            deliver(peer, msg);
        }
    }
}
