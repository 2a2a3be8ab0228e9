//! Inbound and outbound message envelopes.
//!
//! Every frame is a JSON object `{ "type": ..., "payload": ... }`. Both
//! enums below are "adjacently tagged": the variant name goes in `type`
//! and the variant data (if any) in `payload`. Variants without data
//! serialize with no `payload` key at all.
//!
//! Inbound frames are read leniently: `create_room` ignores whatever
//! payload it carries, including none at all.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::{Card, ErrorCode, RoomCode, Seat, Winner};

/// Messages a client sends to the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Open a new room and take the host seat.
    CreateRoom,

    /// Take the guest seat of an existing room.
    #[serde(rename_all = "camelCase")]
    JoinRoom { room_id: RoomCode },

    /// Submit this round's card.
    ///
    /// `room_id` and `from` are accepted for compatibility with clients
    /// that send them, but the server always uses the seat it assigned
    /// to the connection.
    #[serde(rename_all = "camelCase")]
    PlayCard {
        #[serde(skip_serializing_if = "Option::is_none")]
        room_id: Option<RoomCode>,
        #[serde(skip_serializing_if = "Option::is_none")]
        from: Option<Seat>,
        card: Card,
    },
}

const CLIENT_MESSAGE_TYPES: &[&str] = &["create_room", "join_room", "play_card"];

/// The outer `{ type, payload }` shape of an inbound frame. The payload
/// is kept raw until `type` says what it should be.
#[derive(Deserialize)]
struct InboundFrame {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: serde_json::Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JoinRoomPayload {
    room_id: RoomCode,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayCardPayload {
    #[serde(default)]
    room_id: Option<RoomCode>,
    #[serde(default)]
    from: Option<Seat>,
    card: Card,
}

impl<'de> Deserialize<'de> for ClientMessage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let InboundFrame { kind, payload } = InboundFrame::deserialize(deserializer)?;
        match kind.as_str() {
            "create_room" => Ok(Self::CreateRoom),
            "join_room" => {
                let JoinRoomPayload { room_id } =
                    serde_json::from_value(payload).map_err(de::Error::custom)?;
                Ok(Self::JoinRoom { room_id })
            }
            "play_card" => {
                let PlayCardPayload {
                    room_id,
                    from,
                    card,
                } = serde_json::from_value(payload).map_err(de::Error::custom)?;
                Ok(Self::PlayCard {
                    room_id,
                    from,
                    card,
                })
            }
            other => Err(de::Error::unknown_variant(other, CLIENT_MESSAGE_TYPES)),
        }
    }
}

/// Messages the server sends to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ServerMessage {
    /// To the host: the room exists and this is its code.
    #[serde(rename_all = "camelCase")]
    RoomCreated { room_id: RoomCode },

    /// To the guest: the join succeeded.
    #[serde(rename_all = "camelCase")]
    RoomJoined { room_id: RoomCode },

    /// To the host: a guest has taken the other seat.
    GuestJoined,

    /// To the affected party: something went wrong.
    Error(ErrorCode),

    /// To the waiting seat: the opponent has committed a card.
    OpponentPlayed,

    /// To each seat, once per resolved round.
    BattleResult(BattleResult),
}

/// One seat's view of a resolved round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleResult {
    /// Who won the round, from the room's point of view.
    pub winner: Winner,
    /// The seat this message is addressed to.
    pub my_role: Seat,
    /// The recipient's own card.
    pub my_card: Card,
    /// The opponent's card, revealed now that both are committed.
    pub opp_card: Card,
}
