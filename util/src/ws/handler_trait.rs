use super::runtime::WsContext;
use serde::de::DeserializeOwned;
use std::future::Future;

/// What the per-session broadcast pump should do with a room message before
/// it reaches this client.
pub enum BroadcastAction {
    /// Deliver the message unchanged.
    Forward,
    /// Deliver a session-specific rewrite instead.
    Rewrite(String),
    /// Deliver a session-specific rewrite, then close this connection.
    RewriteAndClose(String),
    /// Do not deliver this message to this client.
    Skip,
}

pub trait WsHandler: Send + Sync + 'static {
    /// The incoming message type your handler understands
    type In: DeserializeOwned + Send;

    /// Called once after the socket is fully set up and the room is joined.
    fn on_open(&self, ctx: &WsContext) -> impl Future<Output = ()> + Send {
        async move {
            let _ = ctx;
        }
    }

    /// Called for every parsed text message of type `Self::In`.
    fn on_message(&self, ctx: &WsContext, msg: Self::In) -> impl Future<Output = ()> + Send;

    /// Called for text frames that failed to parse as `Self::In`.
    fn on_invalid(&self, ctx: &WsContext, raw: &str) -> impl Future<Output = ()> + Send {
        async move {
            tracing::warn!("WS invalid message on '{}': raw={raw}", ctx.room);
        }
    }

    /// Inspect a room broadcast before it is forwarded to this client.
    ///
    /// Runs on the session's own pump task, so two sessions in the same room
    /// may resolve the same broadcast differently (e.g. a close directive
    /// that carries a per-role payload).
    fn on_broadcast(&self, raw: &str) -> BroadcastAction {
        let _ = raw;
        BroadcastAction::Forward
    }

    /// Called when the connection is closing (room membership is released
    /// *after* this).
    fn on_close(&self, ctx: &WsContext) -> impl Future<Output = ()> + Send {
        async move {
            let _ = ctx;
        }
    }
}
