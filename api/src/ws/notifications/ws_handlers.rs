use util::ws::handler_trait::WsHandler;
use util::ws::runtime::WsContext;

use crate::ws::auth::UserInfo;

/// A personal notification connection.
///
/// Push-only from the server's point of view: everything it delivers comes
/// from the room broadcast, and inbound frames are ignored.
pub struct NotificationSession {
    user: UserInfo,
}

impl NotificationSession {
    pub fn new(user: UserInfo) -> Self {
        Self { user }
    }
}

impl WsHandler for NotificationSession {
    type In = serde_json::Value;

    async fn on_message(&self, _ctx: &WsContext, msg: Self::In) {
        tracing::debug!(user_id = self.user.id, "Ignoring inbound notification frame: {msg}");
    }

    async fn on_close(&self, _ctx: &WsContext) {
        tracing::debug!(user_id = self.user.id, "Notification session closed");
    }
}
