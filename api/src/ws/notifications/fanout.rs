//! Push notifications for new chat messages.
//!
//! Runs off the chat's critical path: the chat broadcast has already gone
//! out by the time this spawns, and any failure here is logged and dropped.

use sea_orm::DatabaseConnection;
use util::ws::RoomRegistry;

use db::models::intervention::Model as InterventionModel;
use db::models::intervention_message::Model as MessageModel;

use super::events::NewMessageEvent;
use crate::ws::auth::UserInfo;

/// The personal rooms a new message on `intervention` should be pushed to.
///
/// Creator and assignee, minus the sender. Best-effort delivery means a
/// target with no open notification socket simply receives nothing.
pub fn notification_targets(intervention: &InterventionModel, sender_id: i64) -> Vec<i64> {
    let mut targets = Vec::with_capacity(2);
    if intervention.created_by != sender_id {
        targets.push(intervention.created_by);
    }
    if let Some(assignee) = intervention.assigned_to {
        if assignee != sender_id && !targets.contains(&assignee) {
            targets.push(assignee);
        }
    }
    targets
}

/// Pushes a `new_message` event to every participant except the sender.
///
/// The intervention is re-fetched inside the task so the title and assignee
/// reflect the store at push time, not at send time.
pub fn spawn_new_message_push(
    db: DatabaseConnection,
    rooms: RoomRegistry,
    intervention_id: i64,
    sender: UserInfo,
    message: MessageModel,
) {
    tokio::spawn(async move {
        let intervention = match InterventionModel::find_by_id(&db, intervention_id).await {
            Ok(Some(intervention)) => intervention,
            Ok(None) => {
                tracing::warn!(intervention_id, "Notification push for missing intervention");
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, intervention_id, "Notification push lookup failed");
                return;
            }
        };

        let payload = NewMessageEvent::new(&intervention, &sender, &message).to_json();
        for target in notification_targets(&intervention, sender.id) {
            rooms.send_to(target, payload.clone()).await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use db::models::intervention::{InterventionStatus, Priority};

    fn intervention(created_by: i64, assigned_to: Option<i64>) -> InterventionModel {
        let now = Utc::now();
        InterventionModel {
            id: 1,
            title: "t".into(),
            description: "".into(),
            problem_type: "Technical".into(),
            priority: Priority::Low,
            status: InterventionStatus::InProgress,
            created_by,
            assigned_to,
            chat_ended_by_employee: false,
            chat_ended_at: None,
            chat_rating: None,
            created_at: now,
            updated_at: now,
            resolved_at: None,
        }
    }

    #[test]
    fn sender_is_excluded() {
        assert_eq!(notification_targets(&intervention(1, Some(2)), 1), vec![2]);
        assert_eq!(notification_targets(&intervention(1, Some(2)), 2), vec![1]);
    }

    #[test]
    fn unassigned_intervention_notifies_creator_only() {
        assert_eq!(notification_targets(&intervention(1, None), 2), vec![1]);
        assert!(notification_targets(&intervention(1, None), 1).is_empty());
    }

    #[test]
    fn third_party_sender_notifies_both_participants() {
        assert_eq!(notification_targets(&intervention(1, Some(2)), 9), vec![1, 2]);
    }

    #[test]
    fn creator_assigned_to_self_appears_once() {
        assert_eq!(notification_targets(&intervention(1, Some(1)), 9), vec![1]);
    }
}
