//! Integration tests for the duel server, handler, and full connection flow.

use std::time::Duration;

use duelforge::prelude::*;
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio_tungstenite::tungstenite::Message;

// =========================================================================
// Helpers
// =========================================================================

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Starts a server on a random port and returns the address.
async fn start_server() -> String {
    let server = DuelServerBuilder::new()
        .bind("127.0.0.1:0")
        .build()
        .await
        .expect("server should build");

    let addr = server
        .local_addr()
        .expect("should have local addr")
        .to_string();

    tokio::spawn(async move {
        let _ = server.run().await;
    });

    addr
}

async fn connect(addr: &str) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("should connect");
    ws
}

async fn send_json(ws: &mut ClientWs, value: Value) {
    ws.send(Message::text(value.to_string()))
        .await
        .expect("send");
}

/// Receives the next data frame and parses it as JSON.
async fn recv_json(ws: &mut ClientWs) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("stream ended")
            .expect("recv");
        match msg {
            Message::Text(text) => {
                return serde_json::from_str(text.as_str()).expect("decode");
            }
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("expected a text frame, got {other:?}"),
        }
    }
}

/// Asserts nothing arrives within a short window.
async fn assert_silent(ws: &mut ClientWs) {
    let next = tokio::time::timeout(Duration::from_millis(150), ws.next()).await;
    assert!(next.is_err(), "expected silence, got {next:?}");
}

/// Host creates a room, guest joins it. Returns both sockets and the code
/// with every handshake message consumed.
async fn seated_pair(addr: &str) -> (ClientWs, ClientWs, String) {
    let mut host = connect(addr).await;
    let mut guest = connect(addr).await;

    send_json(&mut host, json!({ "type": "create_room" })).await;
    let created = recv_json(&mut host).await;
    assert_eq!(created["type"], "room_created");
    let code = created["payload"]["roomId"]
        .as_str()
        .expect("roomId")
        .to_string();

    send_json(
        &mut guest,
        json!({ "type": "join_room", "payload": { "roomId": code } }),
    )
    .await;
    assert_eq!(
        recv_json(&mut guest).await,
        json!({ "type": "room_joined", "payload": { "roomId": code } })
    );
    assert_eq!(recv_json(&mut host).await, json!({ "type": "guest_joined" }));

    (host, guest, code)
}

fn play(id: i64) -> Value {
    json!({ "type": "play_card", "payload": { "card": { "id": id } } })
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_create_room_returns_six_char_code() {
    let addr = start_server().await;
    let mut ws = connect(&addr).await;

    send_json(&mut ws, json!({ "type": "create_room" })).await;

    let reply = recv_json(&mut ws).await;
    assert_eq!(reply["type"], "room_created");
    let code = reply["payload"]["roomId"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
}

#[tokio::test]
async fn test_full_round_host_wins() {
    let addr = start_server().await;
    let (mut host, mut guest, _code) = seated_pair(&addr).await;

    send_json(&mut host, play(5)).await;
    assert_eq!(recv_json(&mut guest).await, json!({ "type": "opponent_played" }));

    send_json(&mut guest, play(3)).await;

    assert_eq!(
        recv_json(&mut host).await,
        json!({
            "type": "battle_result",
            "payload": {
                "winner": "host",
                "myRole": "host",
                "myCard": { "id": 5 },
                "oppCard": { "id": 3 }
            }
        })
    );
    assert_eq!(
        recv_json(&mut guest).await,
        json!({
            "type": "battle_result",
            "payload": {
                "winner": "host",
                "myRole": "guest",
                "myCard": { "id": 3 },
                "oppCard": { "id": 5 }
            }
        })
    );
}

#[tokio::test]
async fn test_draw_and_next_round() {
    let addr = start_server().await;
    let (mut host, mut guest, _code) = seated_pair(&addr).await;

    send_json(&mut guest, play(4)).await;
    assert_eq!(recv_json(&mut host).await["type"], "opponent_played");
    send_json(&mut host, play(4)).await;
    assert_eq!(recv_json(&mut host).await["payload"]["winner"], "draw");
    assert_eq!(recv_json(&mut guest).await["payload"]["winner"], "draw");

    // Slots are empty again; a new round starts from scratch.
    send_json(&mut host, play(1)).await;
    assert_eq!(recv_json(&mut guest).await["type"], "opponent_played");
    send_json(&mut guest, play(2)).await;
    assert_eq!(recv_json(&mut host).await["payload"]["winner"], "guest");
    assert_eq!(recv_json(&mut guest).await["payload"]["winner"], "guest");
}

#[tokio::test]
async fn test_card_fields_are_echoed() {
    let addr = start_server().await;
    let (mut host, mut guest, code) = seated_pair(&addr).await;

    send_json(
        &mut host,
        json!({
            "type": "play_card",
            "payload": {
                "roomId": code,
                "from": "host",
                "card": { "id": 9, "name": "Dragon", "art": "dragon.png" }
            }
        }),
    )
    .await;
    recv_json(&mut guest).await;
    send_json(&mut guest, play(2)).await;

    let result = recv_json(&mut guest).await;
    assert_eq!(
        result["payload"]["oppCard"],
        json!({ "id": 9, "name": "Dragon", "art": "dragon.png" })
    );
}

#[tokio::test]
async fn test_join_unknown_room() {
    let addr = start_server().await;
    let mut ws = connect(&addr).await;

    send_json(
        &mut ws,
        json!({ "type": "join_room", "payload": { "roomId": "NOPE00" } }),
    )
    .await;

    assert_eq!(
        recv_json(&mut ws).await,
        json!({ "type": "error", "payload": "room_not_found" })
    );
}

#[tokio::test]
async fn test_third_player_gets_room_full() {
    let addr = start_server().await;
    let (mut host, mut guest, code) = seated_pair(&addr).await;
    let mut third = connect(&addr).await;

    send_json(
        &mut third,
        json!({ "type": "join_room", "payload": { "roomId": code } }),
    )
    .await;

    assert_eq!(
        recv_json(&mut third).await,
        json!({ "type": "error", "payload": "room_full" })
    );
    assert_silent(&mut host).await;
    assert_silent(&mut guest).await;
}

#[tokio::test]
async fn test_guest_disconnect_notifies_host() {
    let addr = start_server().await;
    let (mut host, mut guest, code) = seated_pair(&addr).await;

    guest.close(None).await.expect("close");

    assert_eq!(
        recv_json(&mut host).await,
        json!({ "type": "error", "payload": "opponent_disconnected" })
    );

    // The room is gone.
    let mut late = connect(&addr).await;
    send_json(
        &mut late,
        json!({ "type": "join_room", "payload": { "roomId": code } }),
    )
    .await;
    assert_eq!(
        recv_json(&mut late).await,
        json!({ "type": "error", "payload": "room_not_found" })
    );
}

#[tokio::test]
async fn test_host_drop_without_close_notifies_guest() {
    let addr = start_server().await;
    let (host, mut guest, _code) = seated_pair(&addr).await;

    drop(host);

    assert_eq!(
        recv_json(&mut guest).await,
        json!({ "type": "error", "payload": "opponent_disconnected" })
    );
}

#[tokio::test]
async fn test_malformed_frames_get_no_reply() {
    let addr = start_server().await;
    let mut ws = connect(&addr).await;

    ws.send(Message::text("definitely not json")).await.unwrap();
    send_json(&mut ws, json!({ "type": "teleport" })).await;
    send_json(&mut ws, json!({ "payload": {} })).await;
    send_json(&mut ws, json!({ "type": "play_card", "payload": { "card": {} } })).await;
    assert_silent(&mut ws).await;

    // The connection is still usable.
    send_json(&mut ws, json!({ "type": "create_room" })).await;
    assert_eq!(recv_json(&mut ws).await["type"], "room_created");
}

#[tokio::test]
async fn test_binary_frames_are_accepted() {
    let addr = start_server().await;
    let mut ws = connect(&addr).await;

    ws.send(Message::binary(br#"{"type":"create_room"}"#.to_vec()))
        .await
        .unwrap();

    assert_eq!(recv_json(&mut ws).await["type"], "room_created");
}

#[tokio::test]
async fn test_lowercase_join_code() {
    let addr = start_server().await;
    let mut host = connect(&addr).await;
    let mut guest = connect(&addr).await;

    send_json(&mut host, json!({ "type": "create_room" })).await;
    let code = recv_json(&mut host).await["payload"]["roomId"]
        .as_str()
        .unwrap()
        .to_lowercase();

    send_json(
        &mut guest,
        json!({ "type": "join_room", "payload": { "roomId": code } }),
    )
    .await;

    assert_eq!(recv_json(&mut guest).await["type"], "room_joined");
}

#[tokio::test]
async fn test_many_rooms_are_independent() {
    let addr = start_server().await;
    let (mut host_a, mut guest_a, code_a) = seated_pair(&addr).await;
    let (mut host_b, mut guest_b, code_b) = seated_pair(&addr).await;
    assert_ne!(code_a, code_b);

    send_json(&mut host_a, play(7)).await;
    assert_eq!(recv_json(&mut guest_a).await["type"], "opponent_played");
    assert_silent(&mut guest_b).await;

    send_json(&mut guest_b, play(1)).await;
    send_json(&mut host_b, play(2)).await;
    assert_eq!(recv_json(&mut host_b).await["payload"]["winner"], "host");
    assert_silent(&mut host_a).await;
}

#[tokio::test]
async fn test_silent_socket_does_not_block_other_clients() {
    let addr = start_server().await;

    // Opens TCP but never sends the WebSocket upgrade request.
    let _silent = tokio::net::TcpStream::connect(&addr)
        .await
        .expect("tcp connect");

    let mut ws = tokio::time::timeout(Duration::from_secs(3), connect(&addr))
        .await
        .expect("second client should complete its handshake");
    send_json(&mut ws, json!({ "type": "create_room" })).await;
    assert_eq!(recv_json(&mut ws).await["type"], "room_created");
}

#[tokio::test]
async fn test_create_room_with_empty_payload() {
    let addr = start_server().await;
    let mut ws = connect(&addr).await;

    send_json(&mut ws, json!({ "type": "create_room", "payload": {} })).await;

    assert_eq!(recv_json(&mut ws).await["type"], "room_created");
}
