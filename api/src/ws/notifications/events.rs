use serde::Serialize;

use db::models::intervention::Model as InterventionModel;
use db::models::intervention_message::Model as MessageModel;

use crate::ws::auth::UserInfo;

/// Push payload delivered to a participant's personal room when a chat
/// message lands on one of their interventions.
#[derive(Debug, Clone, Serialize)]
pub struct NewMessageEvent {
    pub event: &'static str,
    pub intervention_id: i64,
    pub from_user: String,
    pub message: String,
    pub timestamp: String,
    pub title: String,
}

impl NewMessageEvent {
    pub fn new(intervention: &InterventionModel, sender: &UserInfo, message: &MessageModel) -> Self {
        Self {
            event: "new_message",
            intervention_id: intervention.id,
            from_user: sender.username.clone(),
            message: message.content.clone(),
            timestamp: message.timestamp.to_rfc3339(),
            title: intervention.title.clone(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"event":"new_message"}"#.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use db::models::intervention::{InterventionStatus, Priority};
    use db::models::intervention_message::MessageType;
    use db::models::user::UserType;

    #[test]
    fn new_message_wire_format() {
        let now = Utc::now();
        let intervention = InterventionModel {
            id: 12,
            title: "VPN drops hourly".into(),
            description: "".into(),
            problem_type: "Network".into(),
            priority: Priority::High,
            status: InterventionStatus::InProgress,
            created_by: 1,
            assigned_to: Some(2),
            chat_ended_by_employee: false,
            chat_ended_at: None,
            chat_rating: None,
            created_at: now,
            updated_at: now,
            resolved_at: None,
        };
        let sender = UserInfo {
            id: 2,
            username: "bob".into(),
            user_type: UserType::Employee,
        };
        let message = MessageModel {
            id: 1,
            intervention_id: 12,
            user_id: 2,
            content: "Try the new profile".into(),
            message_type: MessageType::EmployeeMessage,
            timestamp: now,
            is_read: false,
        };

        let json = NewMessageEvent::new(&intervention, &sender, &message).to_json();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["event"], "new_message");
        assert_eq!(v["intervention_id"], 12);
        assert_eq!(v["from_user"], "bob");
        assert_eq!(v["message"], "Try the new profile");
        assert_eq!(v["title"], "VPN drops hourly");
    }
}
