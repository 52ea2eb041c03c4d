use crate::ws::RoomRegistry;
use axum::extract::ws::{Message, Utf8Bytes};
use tokio::sync::mpsc;

/// Per-connection context handed to every handler callback.
///
/// Holds the room this session joined and the registry, plus the queue for
/// frames addressed to this client only. Immutable for the lifetime of the
/// connection.
pub struct WsContext {
    pub room: String,
    pub rooms: RoomRegistry,
    // enqueue frames for the writer task
    out_tx: mpsc::Sender<Message>,
}

impl WsContext {
    pub fn new(room: String, rooms: RoomRegistry, out_tx: mpsc::Sender<Message>) -> Self {
        Self {
            room,
            rooms,
            out_tx,
        }
    }

    /// Send a *single* text frame to this client only
    pub async fn reply_text(&self, text: impl Into<Utf8Bytes>) -> Result<(), ()> {
        self.out_tx
            .send(Message::Text(text.into()))
            .await
            .map_err(|_| ())
    }

    /// Send a WS-level pong to this client
    pub async fn reply_pong(&self, payload: bytes::Bytes) -> Result<(), ()> {
        self.out_tx
            .send(Message::Pong(payload))
            .await
            .map_err(|_| ())
    }

    /// Broadcast raw text to every session in this room
    pub async fn broadcast_text(&self, text: impl Into<String>) {
        self.rooms.broadcast(&self.room, text).await;
    }
}
