use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use sea_orm::DatabaseConnection;
use util::ws::handler_trait::{BroadcastAction, WsHandler};
use util::ws::runtime::WsContext;

use db::models::intervention::Model as InterventionModel;
use db::models::intervention_message::{MessageType, Model as MessageModel};

use super::common::{ChatCommand, ChatIncoming};
use super::events::{self, ChatEvent, is_close_directive};
use crate::ws::access::{self, ChatAction};
use crate::ws::auth::UserInfo;
use crate::ws::error::ChatError;
use crate::ws::notifications::fanout;

/// One live chat connection, bound to one resolved user and one
/// intervention for its whole lifetime.
///
/// Lifecycle: the upgrade handler performs the connecting checks, so by the
/// time this exists the session is joined. Frames are dispatched one at a
/// time until the connection drops or the room's close directive arrives;
/// after that the session is closed and ignores anything further.
pub struct ChatSession {
    db: DatabaseConnection,
    user: UserInfo,
    intervention_id: i64,
    /// Set once the close directive has been observed. Terminal.
    closed: AtomicBool,
}

impl ChatSession {
    pub fn new(db: DatabaseConnection, user: UserInfo, intervention_id: i64) -> Self {
        Self {
            db,
            user,
            intervention_id,
            closed: AtomicBool::new(false),
        }
    }

    /// Fresh snapshot per frame: another session may have closed the
    /// intervention since the last one.
    async fn load_intervention(&self) -> Result<InterventionModel, ChatError> {
        InterventionModel::find_by_id(&self.db, self.intervention_id)
            .await?
            .ok_or_else(|| ChatError::NotFound("Intervention not found.".into()))
    }

    async fn handle_send(&self, ctx: &WsContext, message: String) -> Result<(), ChatError> {
        let intervention = self.load_intervention().await?;

        if intervention.is_closed() {
            return Err(ChatError::Forbidden(
                "Chat is closed. No more messages can be sent.".into(),
            ));
        }
        if !access::may_act(&self.user, &intervention, ChatAction::SendMessage) {
            return Err(ChatError::Forbidden(
                "Only clients and employees can send messages in the chat.".into(),
            ));
        }

        let content = message.trim();
        if content.is_empty() {
            return Err(ChatError::Validation("Message cannot be empty.".into()));
        }

        let message_type = if self.user.user_type.is_employee() {
            MessageType::EmployeeMessage
        } else {
            MessageType::ClientMessage
        };
        let saved = MessageModel::create(
            &self.db,
            self.intervention_id,
            self.user.id,
            content,
            message_type,
        )
        .await?;

        // Broadcast strictly after persistence so every participant observes
        // the store's order.
        events::broadcast(ctx, &ChatEvent::chat_message(&saved, &self.user)).await;

        // Fire-and-forget: a notification failure must never delay or fail
        // the chat path.
        fanout::spawn_new_message_push(
            self.db.clone(),
            ctx.rooms.clone(),
            self.intervention_id,
            self.user.clone(),
            saved,
        );

        Ok(())
    }

    async fn handle_end_chat(&self, ctx: &WsContext) -> Result<(), ChatError> {
        let intervention = self.load_intervention().await?;

        if !access::may_act(&self.user, &intervention, ChatAction::EndChat) {
            return Err(ChatError::Forbidden("Only employees can end the chat.".into()));
        }

        InterventionModel::end_chat_by_employee(&self.db, self.intervention_id).await?;

        // Ticket-level side effect, not a chat message: the announcement is
        // broadcast but never persisted to the log.
        let announcement = ChatEvent::Chat {
            message: "Chat has been ended by the employee.".into(),
            user: self.user.username.clone(),
            timestamp: Utc::now().to_rfc3339(),
            user_id: self.user.id,
            message_type: MessageType::SystemMessage,
            user_type: self.user.user_type,
        };
        events::broadcast(ctx, &announcement).await;

        // Every session in the room, this one included, rewrites the
        // directive for its own role and then terminates.
        events::broadcast(ctx, &ChatEvent::CloseChatChannel { show_rating: false }).await;

        Ok(())
    }

    async fn handle_rate_chat(&self, ctx: &WsContext, rating: Option<i32>) -> Result<(), ChatError> {
        let intervention = self.load_intervention().await?;

        if !access::may_act(&self.user, &intervention, ChatAction::RateChat) {
            return Err(ChatError::Forbidden(
                "Only the client can rate the chat once it has been closed.".into(),
            ));
        }

        let rating = rating
            .filter(|r| (1..=5).contains(r))
            .ok_or_else(|| ChatError::Validation("A rating between 1 and 5 is required.".into()))?;

        InterventionModel::set_rating(&self.db, self.intervention_id, rating).await?;

        events::reply(
            ctx,
            &ChatEvent::system(format!("Thank you for rating this chat: {rating} stars.")),
        )
        .await;

        Ok(())
    }
}

impl WsHandler for ChatSession {
    type In = ChatIncoming;

    async fn on_open(&self, ctx: &WsContext) {
        events::reply(
            ctx,
            &ChatEvent::system(format!(
                "Connected to intervention #{}",
                self.intervention_id
            )),
        )
        .await;
    }

    async fn on_message(&self, ctx: &WsContext, msg: Self::In) {
        if self.closed.load(Ordering::Acquire) {
            return;
        }

        let result = match msg {
            ChatIncoming::Send { message } => self.handle_send(ctx, message).await,
            ChatIncoming::Command(ChatCommand::EndChat) => self.handle_end_chat(ctx).await,
            ChatIncoming::Command(ChatCommand::RateChat { rating }) => {
                self.handle_rate_chat(ctx, rating).await
            }
        };

        if let Err(err) = result {
            events::reply_error(ctx, err).await;
        }
    }

    async fn on_invalid(&self, ctx: &WsContext, raw: &str) {
        tracing::debug!(room = %ctx.room, "Unparseable chat frame: {raw}");
        events::reply(
            ctx,
            &ChatEvent::error("Unrecognized message. Send {\"message\": ...} or a known action."),
        )
        .await;
    }

    fn on_broadcast(&self, raw: &str) -> BroadcastAction {
        if is_close_directive(raw) {
            self.closed.store(true, Ordering::Release);
            let own = ChatEvent::CloseChatChannel {
                show_rating: self.user.user_type.is_client(),
            };
            BroadcastAction::RewriteAndClose(own.to_json())
        } else {
            BroadcastAction::Forward
        }
    }
}
