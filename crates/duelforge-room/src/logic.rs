//! Round resolution: buffering both seats' cards and comparing them.

use std::cmp::Ordering;

use duelforge_protocol::{BattleResult, Card, Seat, Winner};

/// Decides a round. Strictly stronger wins; equal strength is a draw.
pub fn resolve(host: &Card, guest: &Card) -> Winner {
    match host.cmp_strength(guest) {
        Ordering::Greater => Winner::Host,
        Ordering::Less => Winner::Guest,
        Ordering::Equal => Winner::Draw,
    }
}

/// The per-seat pending card slots of a room.
///
/// Each slot holds at most one card. A second card from the same seat
/// before the round resolves replaces the first.
#[derive(Debug, Clone, Default)]
pub(crate) struct Pending {
    host: Option<Card>,
    guest: Option<Card>,
}

impl Pending {
    /// Stores `card` for `seat`, returning the card it replaced, if any.
    pub(crate) fn set(&mut self, seat: Seat, card: Card) -> Option<Card> {
        self.slot_mut(seat).replace(card)
    }

    pub(crate) fn get(&self, seat: Seat) -> Option<&Card> {
        match seat {
            Seat::Host => self.host.as_ref(),
            Seat::Guest => self.guest.as_ref(),
        }
    }

    /// Empties both slots and returns the completed round, but only when
    /// both slots are full. Otherwise leaves everything untouched.
    pub(crate) fn take_round(&mut self) -> Option<Round> {
        if self.host.is_none() || self.guest.is_none() {
            return None;
        }
        let host = self.host.take()?;
        let guest = self.guest.take()?;
        Some(Round::new(host, guest))
    }

    fn slot_mut(&mut self, seat: Seat) -> &mut Option<Card> {
        match seat {
            Seat::Host => &mut self.host,
            Seat::Guest => &mut self.guest,
        }
    }
}

/// A resolved round: both cards and the outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub host_card: Card,
    pub guest_card: Card,
    pub winner: Winner,
}

impl Round {
    pub fn new(host_card: Card, guest_card: Card) -> Self {
        let winner = resolve(&host_card, &guest_card);
        Self {
            host_card,
            guest_card,
            winner,
        }
    }

    /// The round as seen from `seat`: own card first, then the opponent's.
    pub fn view(&self, seat: Seat) -> BattleResult {
        let (mine, theirs) = match seat {
            Seat::Host => (&self.host_card, &self.guest_card),
            Seat::Guest => (&self.guest_card, &self.host_card),
        };
        BattleResult {
            winner: self.winner,
            my_role: seat,
            my_card: mine.clone(),
            opp_card: theirs.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_all_orderings() {
        for host in -3..=3 {
            for guest in -3..=3 {
                let expected = if host > guest {
                    Winner::Host
                } else if guest > host {
                    Winner::Guest
                } else {
                    Winner::Draw
                };
                assert_eq!(
                    resolve(&Card::new(host), &Card::new(guest)),
                    expected,
                    "host {host} vs guest {guest}"
                );
            }
        }
    }

    #[test]
    fn test_pending_round_needs_both_seats() {
        let mut pending = Pending::default();
        pending.set(Seat::Host, Card::new(5));

        assert!(pending.take_round().is_none());
        assert_eq!(pending.get(Seat::Host), Some(&Card::new(5)));
    }

    #[test]
    fn test_pending_take_round_clears_both_slots() {
        let mut pending = Pending::default();
        pending.set(Seat::Host, Card::new(5));
        pending.set(Seat::Guest, Card::new(3));

        let round = pending.take_round().expect("both slots full");

        assert_eq!(round.winner, Winner::Host);
        assert!(pending.get(Seat::Host).is_none());
        assert!(pending.get(Seat::Guest).is_none());
    }

    #[test]
    fn test_pending_set_overwrites_same_seat() {
        let mut pending = Pending::default();
        assert_eq!(pending.set(Seat::Guest, Card::new(1)), None);
        assert_eq!(pending.set(Seat::Guest, Card::new(9)), Some(Card::new(1)));
        assert_eq!(pending.get(Seat::Guest), Some(&Card::new(9)));
    }

    #[test]
    fn test_round_views_are_mirrored() {
        let round = Round::new(Card::new(5), Card::new(3));

        let host = round.view(Seat::Host);
        assert_eq!(host.winner, Winner::Host);
        assert_eq!(host.my_role, Seat::Host);
        assert_eq!(host.my_card, Card::new(5));
        assert_eq!(host.opp_card, Card::new(3));

        let guest = round.view(Seat::Guest);
        assert_eq!(guest.winner, Winner::Host);
        assert_eq!(guest.my_role, Seat::Guest);
        assert_eq!(guest.my_card, Card::new(3));
        assert_eq!(guest.opp_card, Card::new(5));
    }
}
