//! Access decisions for room joins and chat actions.
//!
//! Every function here is a pure function of the resolved identity and an
//! intervention snapshot; there is no hidden state and no I/O, so the rules
//! are unit-tested directly.

use db::models::intervention::Model as InterventionModel;
use db::models::user::UserType;

use super::auth::{Identity, UserInfo};

/// An action a joined session may attempt against its intervention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatAction {
    SendMessage,
    EndChat,
    RateChat,
}

/// May `identity` join the chat room of `intervention`?
///
/// Staff (employee/admin) may join any intervention's chat. Clients may join
/// only interventions they created or are assigned to. Anonymous callers are
/// always denied.
pub fn may_join_chat(identity: &Identity, intervention: &InterventionModel) -> bool {
    match identity {
        Identity::Anonymous => false,
        Identity::Known(user) => {
            user.user_type.is_employee() || intervention.is_participant(user.id)
        }
    }
}

/// May `identity` join the personal notification room of `room_user_id`?
///
/// Only the user themselves; staff have no access to other users' streams.
pub fn may_join_personal(identity: &Identity, room_user_id: i64) -> bool {
    match identity {
        Identity::Anonymous => false,
        Identity::Known(user) => user.id == room_user_id,
    }
}

/// May a joined `user` perform `action` against `intervention` right now?
pub fn may_act(user: &UserInfo, intervention: &InterventionModel, action: ChatAction) -> bool {
    match action {
        // Only the two conversing roles write chat messages; admins moderate
        // but do not participate. Closed chats take no further messages.
        ChatAction::SendMessage => {
            matches!(user.user_type, UserType::Client | UserType::Employee)
                && !intervention.is_closed()
        }
        ChatAction::EndChat => user.user_type.is_employee(),
        ChatAction::RateChat => user.user_type.is_client() && intervention.is_closed(),
    }
}
