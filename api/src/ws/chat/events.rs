use serde::Serialize;
use util::ws::runtime::WsContext;

use db::models::intervention_message::{MessageType, Model as MessageModel};
use db::models::user::UserType;

use crate::ws::auth::UserInfo;
use crate::ws::error::ChatError;

/// Outbound events on a chat room, in the wire format clients consume.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// Server-originated notice (welcome, rating acknowledgement).
    System { message: String, user: &'static str },
    /// A persisted chat message.
    Chat {
        message: String,
        user: String,
        timestamp: String,
        user_id: i64,
        message_type: MessageType,
        user_type: UserType,
    },
    /// Something about the last frame was rejected; sent to the sender only.
    Error { message: String },
    /// Room-wide directive: the chat is over. Each session rewrites
    /// `show_rating` for its own role before delivery.
    CloseChatChannel { show_rating: bool },
}

impl ChatEvent {
    pub fn system(message: impl Into<String>) -> Self {
        ChatEvent::System {
            message: message.into(),
            user: "System",
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ChatEvent::Error {
            message: message.into(),
        }
    }

    /// The broadcast form of a persisted message.
    pub fn chat_message(message: &MessageModel, author: &UserInfo) -> Self {
        ChatEvent::Chat {
            message: message.content.clone(),
            user: author.username.clone(),
            timestamp: message.timestamp.to_rfc3339(),
            user_id: author.id,
            message_type: message.message_type,
            user_type: author.user_type,
        }
    }

    pub fn to_json(&self) -> String {
        // Serialization of these variants cannot fail; fall back to a bare
        // error event rather than panicking in the session path.
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"type":"error","message":"internal error"}"#.to_string())
    }
}

/// True if `raw` is the room-wide close directive.
pub fn is_close_directive(raw: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(raw)
        .map(|v| v.get("type").and_then(|t| t.as_str()) == Some("close_chat_channel"))
        .unwrap_or(false)
}

/// Broadcast `event` to every session in this connection's room.
pub async fn broadcast(ctx: &WsContext, event: &ChatEvent) {
    ctx.broadcast_text(event.to_json()).await;
}

/// Send `event` to this session only.
pub async fn reply(ctx: &WsContext, event: &ChatEvent) {
    let _ = ctx.reply_text(event.to_json()).await;
}

/// Render a frame-time failure as an `error` event to the sender only.
pub async fn reply_error(ctx: &WsContext, err: ChatError) {
    if let ChatError::Store(ref e) = err {
        tracing::warn!(error = %e, room = %ctx.room, "Store error on chat path");
    }
    reply(ctx, &ChatEvent::error(err.to_string())).await;
}
