//! Per-connection handler: pumps frames between one socket and the
//! dispatcher.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Open an outbound channel and announce the connection
//!   2. Loop: forward inbound frames to the dispatcher, and write
//!      outbound messages from the channel to the socket
//!   3. On exit, the guard reports the connection closed

use duelforge_protocol::{Codec, ServerMessage};
use duelforge_transport::{Connection, ConnectionId, WebSocketConnection};
use tokio::sync::mpsc;

use crate::DuelError;
use crate::dispatcher::RouterEvent;

/// Drop guard that reports a connection closed when the handler exits.
///
/// This ensures teardown happens even if the handler returns early on an
/// error. Since `Drop` is synchronous, we spawn a fire-and-forget task
/// for the channel send.
struct ConnectionGuard {
    conn_id: ConnectionId,
    events: mpsc::Sender<RouterEvent>,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        let conn_id = self.conn_id;
        let events = self.events.clone();
        tokio::spawn(async move {
            let _ = events.send(RouterEvent::Closed { conn_id }).await;
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    events: mpsc::Sender<RouterEvent>,
    codec: C,
) -> Result<(), DuelError> {
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    let (peer, mut outbound) = mpsc::unbounded_channel::<ServerMessage>();
    events
        .send(RouterEvent::Connected { conn_id, peer })
        .await
        .map_err(|_| DuelError::DispatcherStopped)?;
    let _guard = ConnectionGuard {
        conn_id,
        events: events.clone(),
    };

    loop {
        tokio::select! {
            inbound = conn.recv() => match inbound {
                Ok(Some(frame)) => {
                    events
                        .send(RouterEvent::Frame { conn_id, frame })
                        .await
                        .map_err(|_| DuelError::DispatcherStopped)?;
                }
                Ok(None) => {
                    tracing::info!(%conn_id, "connection closed cleanly");
                    break;
                }
                Err(e) => {
                    tracing::debug!(%conn_id, error = %e, "recv error");
                    break;
                }
            },
            Some(msg) = outbound.recv() => {
                let bytes = codec.encode(&msg)?;
                conn.send(&bytes).await?;
            }
        }
    }

    // _guard drops here → the dispatcher tears down the seat.
    Ok(())
}
