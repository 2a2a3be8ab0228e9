//! `DuelServer` builder and server loop.
//!
//! This is the entry point for running a duel server. It ties together
//! all the layers: transport → handler → dispatcher → router → rooms.

use std::net::SocketAddr;

use duelforge_protocol::JsonCodec;
use duelforge_room::{RoomConfig, RoomRegistry, SessionRouter};
use duelforge_transport::{Incoming, Transport, WebSocketTransport};
use tokio::sync::mpsc;

use crate::DuelError;
use crate::dispatcher::{Dispatcher, RouterEvent};
use crate::handler::handle_connection;

/// Default depth of the dispatcher's event channel.
pub const DEFAULT_EVENT_BUFFER: usize = 256;

/// Builder for configuring and starting a duel server.
///
/// # Example
///
/// ```rust,no_run
/// use duelforge::prelude::*;
///
/// # async fn start() -> Result<(), DuelError> {
/// let server = DuelServer::builder()
///     .bind("0.0.0.0:3000")
///     .room_config(RoomConfig { code_length: 6 })
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DuelServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
    event_buffer: usize,
}

impl DuelServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            room_config: RoomConfig::default(),
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the room configuration.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Sets how many connection events may queue for the dispatcher
    /// before handlers wait. Clamped to at least 1.
    pub fn event_buffer(mut self, depth: usize) -> Self {
        self.event_buffer = depth.max(1);
        self
    }

    /// Binds the listener and starts the dispatcher task.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`.
    pub async fn build(self) -> Result<DuelServer, DuelError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let router = SessionRouter::with_parts(
            RoomRegistry::new(self.room_config),
            JsonCodec,
        );
        let events = Dispatcher::spawn(router, self.event_buffer);

        Ok(DuelServer {
            transport,
            events,
            codec: JsonCodec,
        })
    }
}

impl Default for DuelServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound duel server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct DuelServer {
    transport: WebSocketTransport,
    events: mpsc::Sender<RouterEvent>,
    codec: JsonCodec,
}

impl DuelServer {
    /// Creates a new builder.
    pub fn builder() -> DuelServerBuilder {
        DuelServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming sockets and spawns a task for each that completes
    /// the WebSocket handshake and then runs the connection handler.
    /// Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), DuelError> {
        match self.local_addr() {
            Ok(addr) => tracing::info!(%addr, "duel server running"),
            Err(_) => tracing::info!("duel server running"),
        }

        loop {
            match self.transport.accept().await {
                Ok(incoming) => {
                    let events = self.events.clone();
                    let codec = self.codec;
                    // The handshake runs in the connection's own task so a
                    // stalled client can't hold up the accept loop.
                    tokio::spawn(async move {
                        let peer_addr = incoming.peer_addr();
                        let conn = match incoming.upgrade().await {
                            Ok(conn) => conn,
                            Err(e) => {
                                tracing::debug!(%peer_addr, error = %e, "handshake failed");
                                return;
                            }
                        };
                        if let Err(e) = handle_connection(conn, events, codec).await {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "accept failed");
                }
            }
        }
    }
}
