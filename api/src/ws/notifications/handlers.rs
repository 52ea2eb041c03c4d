use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State, WebSocketUpgrade},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use util::config;
use util::state::AppState;
use util::ws::serve::{WsServerOptions, serve_room};

use super::ws_handlers::NotificationSession;
use crate::ws::access;
use crate::ws::auth::{Identity, resolve_token};
use crate::ws::error::ChatError;
use crate::ws::rooms::RoomKey;

/// GET /ws/notifications?token={jwt}
///
/// The room is derived from the token, never from the URL, so a session can
/// only ever land in its own personal room.
pub async fn notification_ws_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let identity = resolve_token(app_state.db(), params.get("token").map(String::as_str)).await;
    let Identity::Known(user) = identity else {
        return ChatError::Unauthenticated.connect_status().into_response();
    };

    if !access::may_join_personal(&Identity::Known(user.clone()), user.id) {
        return StatusCode::FORBIDDEN.into_response();
    }

    tracing::info!(
        user_id = user.id,
        username = %user.username,
        "Notification session joining"
    );

    let room = RoomKey::User(user.id).path();
    let handler = Arc::new(NotificationSession::new(user));
    let rooms = app_state.rooms_clone();
    let opts = WsServerOptions {
        ws_ping_sec: config::ws_ping_seconds(),
    };

    ws.on_upgrade(move |socket| serve_room(socket, rooms, room, handler, opts))
}
