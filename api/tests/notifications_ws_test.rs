mod helpers;

use futures_util::{SinkExt, StreamExt};
use helpers::{connect_ws, make_test_app, next_json, seed_users, spawn_server};
use serde_json::json;
use serial_test::serial;
use tokio::time::{Duration, timeout};
use tokio_tungstenite::tungstenite::Error;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::protocol::Message;

use api::auth::generate_jwt;
use db::models::intervention::{Model as InterventionModel, Priority};

#[tokio::test]
async fn notification_socket_requires_a_token() {
    let (app, _app_state) = make_test_app().await;
    let addr = spawn_server(app).await;

    let req = format!("ws://{addr}/ws/notifications")
        .into_client_request()
        .unwrap();
    match tokio_tungstenite::connect_async(req).await {
        Err(Error::Http(resp)) => assert_eq!(resp.status(), 401),
        other => panic!("expected 401 rejection, got {other:?}"),
    }
}

#[tokio::test]
#[serial]
async fn new_message_is_pushed_to_the_other_participant_only() {
    let (app, app_state) = make_test_app().await;
    let users = seed_users(app_state.db()).await;
    let intervention = InterventionModel::create(
        app_state.db(),
        users.client.id,
        "VPN drops hourly",
        "Every hour, on the hour",
        "Network",
        Priority::Medium,
    )
    .await
    .unwrap();
    InterventionModel::assign_employee(
        app_state.db(),
        intervention.id,
        users.employee.id,
        users.employee.id,
        &users.employee.username,
    )
    .await
    .unwrap();
    let addr = spawn_server(app).await;

    let (client_token, _) = generate_jwt(users.client.id);
    let (employee_token, _) = generate_jwt(users.employee.id);

    let (mut client_inbox, _) = connect_ws(&addr.to_string(), "notifications", &client_token)
        .await
        .unwrap();
    let (mut employee_inbox, _) = connect_ws(&addr.to_string(), "notifications", &employee_token)
        .await
        .unwrap();

    let (mut chat, _) = connect_ws(
        &addr.to_string(),
        &format!("chat/{}", intervention.id),
        &employee_token,
    )
    .await
    .unwrap();
    let _ = next_json(&mut chat).await;

    chat.send(Message::Text(json!({"message": "try the new profile"}).to_string().into()))
        .await
        .unwrap();
    let _ = next_json(&mut chat).await;

    let push = next_json(&mut client_inbox).await;
    assert_eq!(push["event"], "new_message");
    assert_eq!(push["intervention_id"], intervention.id);
    assert_eq!(push["from_user"], "bob");
    assert_eq!(push["message"], "try the new profile");
    assert_eq!(push["title"], "VPN drops hourly");

    // The sender's own inbox stays silent.
    assert!(
        timeout(Duration::from_millis(300), employee_inbox.next())
            .await
            .is_err()
    );
}

#[tokio::test]
#[serial]
async fn inbound_frames_on_the_notification_socket_are_ignored() {
    let (app, app_state) = make_test_app().await;
    let users = seed_users(app_state.db()).await;
    let addr = spawn_server(app).await;

    let (token, _) = generate_jwt(users.client.id);
    let (mut inbox, _) = connect_ws(&addr.to_string(), "notifications", &token)
        .await
        .unwrap();

    inbox
        .send(Message::Text(json!({"event": "spoofed"}).to_string().into()))
        .await
        .unwrap();

    assert!(timeout(Duration::from_millis(300), inbox.next()).await.is_err());
}
