use sea_orm::DatabaseConnection;

use crate::models::intervention::{InterventionStatus, Model as InterventionModel, Priority};
use crate::models::intervention_message::{MessageType, Model as MessageModel};
use crate::models::user::{Model as UserModel, UserType};
use crate::test_utils::setup_test_db;

async fn seed(db: &DatabaseConnection) -> (UserModel, UserModel, InterventionModel) {
    let client = UserModel::create(db, "alice", "alice@test.com", "password123", UserType::Client)
        .await
        .unwrap();
    let employee = UserModel::create(db, "bob", "bob@test.com", "password123", UserType::Employee)
        .await
        .unwrap();
    let intervention = InterventionModel::create(
        db,
        client.id,
        "Printer on fire",
        "Smoke everywhere",
        "Technical",
        Priority::High,
    )
    .await
    .unwrap();
    (client, employee, intervention)
}

#[tokio::test]
async fn password_hashes_verify_and_reject() {
    let db = setup_test_db().await;
    let (client, _, _) = seed(&db).await;

    assert!(client.verify_password("password123"));
    assert!(!client.verify_password("hunter2"));
    assert_ne!(client.password_hash, "password123");
}

#[tokio::test]
async fn message_log_is_ordered_by_timestamp_then_id() {
    let db = setup_test_db().await;
    let (client, employee, intervention) = seed(&db).await;

    // Writes land within the same clock tick on sqlite; the id tiebreak must
    // keep the read-back order equal to the insert order.
    for (user, content) in [
        (&client, "first"),
        (&employee, "second"),
        (&client, "third"),
    ] {
        MessageModel::create(
            &db,
            intervention.id,
            user.id,
            content,
            MessageType::ClientMessage,
        )
        .await
        .unwrap();
    }

    let log = MessageModel::find_all_for_intervention(&db, intervention.id)
        .await
        .unwrap();
    let contents: Vec<&str> = log.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["first", "second", "third"]);
    assert!(log.windows(2).all(|w| w[0].id < w[1].id));
}

#[tokio::test]
async fn assignment_moves_to_in_progress_and_leaves_a_note() {
    let db = setup_test_db().await;
    let (_, employee, intervention) = seed(&db).await;

    let updated = InterventionModel::assign_employee(
        &db,
        intervention.id,
        employee.id,
        employee.id,
        &employee.username,
    )
    .await
    .unwrap();

    assert_eq!(updated.status, InterventionStatus::InProgress);
    assert_eq!(updated.assigned_to, Some(employee.id));
    assert!(updated.is_participant(employee.id));

    let log = MessageModel::find_all_for_intervention(&db, intervention.id)
        .await
        .unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].message_type, MessageType::SystemMessage);
    assert_eq!(log[0].content, "Intervention assigned to bob");
}

#[tokio::test]
async fn ending_the_chat_closes_the_intervention() {
    let db = setup_test_db().await;
    let (_, _, intervention) = seed(&db).await;

    assert!(!intervention.is_closed());
    let closed = InterventionModel::end_chat_by_employee(&db, intervention.id)
        .await
        .unwrap();

    assert_eq!(closed.status, InterventionStatus::Closed);
    assert!(closed.chat_ended_by_employee);
    assert!(closed.chat_ended_at.is_some());
    assert!(closed.is_closed());
}

#[tokio::test]
async fn rating_overwrites_the_previous_value() {
    let db = setup_test_db().await;
    let (_, _, intervention) = seed(&db).await;
    InterventionModel::end_chat_by_employee(&db, intervention.id)
        .await
        .unwrap();

    InterventionModel::set_rating(&db, intervention.id, 2).await.unwrap();
    let updated = InterventionModel::set_rating(&db, intervention.id, 5).await.unwrap();
    assert_eq!(updated.chat_rating, Some(5));
}

#[tokio::test]
async fn resolving_stamps_resolved_at() {
    let db = setup_test_db().await;
    let (_, _, intervention) = seed(&db).await;

    let resolved =
        InterventionModel::set_status(&db, intervention.id, InterventionStatus::Resolved)
            .await
            .unwrap();
    assert_eq!(resolved.status, InterventionStatus::Resolved);
    assert!(resolved.resolved_at.is_some());
}
