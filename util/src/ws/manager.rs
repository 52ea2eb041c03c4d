//! A thread-safe room registry for broadcast-group messaging over WebSockets.
//!
//! Uses one Tokio broadcast channel per room. A session joins a room by
//! subscribing and leaves it by dropping its receiver, so a disconnected
//! session stops counting against the room immediately.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

/// Type alias for a room key (e.g. `chat_7`, `user_3`).
type Room = String;

/// Sender for a room's broadcast channel.
type Sender = broadcast::Sender<String>;

/// Receiver for a room's broadcast channel.
type Receiver = broadcast::Receiver<String>;

/// Manages broadcast channels per room to support real-time fan-out.
///
/// - Lazily creates a channel per room on first join
/// - Removes rooms when their subscriber count drops to zero after sending
/// - Delivery is best-effort: a session that disconnects mid-broadcast
///   simply does not receive the message; nothing is retried
#[derive(Clone, Default)]
pub struct RoomRegistry {
    /// Map of room keys to broadcast senders.
    pub inner: Arc<RwLock<HashMap<Room, Sender>>>,
}

impl RoomRegistry {
    /// Creates a new, empty `RoomRegistry`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins the given room, creating it if necessary.
    pub async fn subscribe(&self, room: &str) -> Receiver {
        let mut map = self.inner.write().await;
        map.entry(room.to_string())
            .or_insert_with(|| broadcast::channel(100).0)
            .subscribe()
    }

    /// Broadcasts a message to all sessions currently in `room`.
    ///
    /// If the room does not exist, it's a no-op.
    /// If the room has zero subscribers after sending, it is removed.
    pub async fn broadcast<T: Into<String>>(&self, room: &str, msg: T) {
        let mut map = self.inner.write().await;
        if let Some(sender) = map.get(room) {
            let _ = sender.send(msg.into());
            if sender.receiver_count() == 0 {
                tracing::info!("Removing room '{room}' due to no subscribers.");
                map.remove(room);
            }
        }
    }

    /// Pushes a message to every live session in `user_id`'s personal room.
    ///
    /// Shorthand over [`broadcast`](Self::broadcast) used by the notification
    /// fan-out; a user with no open notification socket receives nothing.
    pub async fn send_to<T: Into<String>>(&self, user_id: i64, msg: T) {
        self.broadcast(&format!("user_{user_id}"), msg).await;
    }

    /// Returns the number of sessions currently joined to `room`.
    pub async fn session_count(&self, room: &str) -> usize {
        let map = self.inner.read().await;
        map.get(room).map(|s| s.receiver_count()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{Duration, timeout};

    #[tokio::test]
    async fn it_broadcasts_to_all_sessions() {
        let registry = RoomRegistry::new();
        let room = "chat_1";

        let mut r1 = registry.subscribe(room).await;
        let mut r2 = registry.subscribe(room).await;

        registry.broadcast(room, "hello world").await;

        let msg1 = timeout(Duration::from_millis(50), r1.recv())
            .await
            .unwrap()
            .unwrap();
        let msg2 = timeout(Duration::from_millis(50), r2.recv())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(msg1, "hello world");
        assert_eq!(msg2, "hello world");
    }

    #[tokio::test]
    async fn it_creates_rooms_lazily() {
        let registry = RoomRegistry::new();
        let room = "chat_42";
        assert!(registry.inner.read().await.get(room).is_none());
        let _rx = registry.subscribe(room).await;
        assert!(registry.inner.read().await.get(room).is_some());
    }

    #[tokio::test]
    async fn broadcast_to_empty_room_does_not_panic() {
        let registry = RoomRegistry::new();
        registry.broadcast("chat_404", "silent").await;
    }

    #[tokio::test]
    async fn room_is_removed_after_broadcast_if_no_sessions() {
        let registry = RoomRegistry::new();
        let room = "chat_9";
        {
            let _ = registry.subscribe(room).await;
        } // drop receiver: session left
        assert_eq!(registry.session_count(room).await, 0);
        registry.broadcast(room, "cleanup").await;
        let map = registry.inner.read().await;
        assert!(!map.contains_key(room));
    }

    #[tokio::test]
    async fn send_to_targets_the_personal_room() {
        let registry = RoomRegistry::new();
        let mut rx = registry.subscribe("user_7").await;
        registry.send_to(7, "ping").await;
        let msg = timeout(Duration::from_millis(50), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(msg, "ping");
    }

    #[tokio::test]
    async fn personal_room_tolerates_multiple_sessions_for_one_user() {
        let registry = RoomRegistry::new();
        let mut a = registry.subscribe("user_3").await;
        let mut b = registry.subscribe("user_3").await;
        assert_eq!(registry.session_count("user_3").await, 2);
        registry.send_to(3, "both").await;
        assert_eq!(a.recv().await.unwrap(), "both");
        assert_eq!(b.recv().await.unwrap(), "both");
    }
}
