use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State, WebSocketUpgrade},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use util::config;
use util::state::AppState;
use util::ws::serve::{WsServerOptions, serve_room};

use db::models::intervention::Model as InterventionModel;

use super::ws_handlers::ChatSession;
use crate::ws::access;
use crate::ws::auth::{Identity, resolve_token};
use crate::ws::error::ChatError;
use crate::ws::rooms::RoomKey;

/// GET /ws/chat/{intervention_id}?token={jwt}
///
/// All joining checks happen here, before the upgrade. Denials are bare
/// status codes: a missing intervention and a forbidden one are
/// indistinguishable to the caller.
pub async fn chat_ws_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
    Path(intervention_id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let identity = resolve_token(app_state.db(), params.get("token").map(String::as_str)).await;
    let Identity::Known(user) = identity else {
        return ChatError::Unauthenticated.connect_status().into_response();
    };

    let intervention = match InterventionModel::find_by_id(app_state.db(), intervention_id).await {
        Ok(Some(intervention)) => intervention,
        Ok(None) => {
            return ChatError::NotFound(String::new()).connect_status().into_response();
        }
        Err(e) => {
            tracing::warn!(error = %e, intervention_id, "Store error during chat join");
            return StatusCode::SERVICE_UNAVAILABLE.into_response();
        }
    };

    if !access::may_join_chat(&Identity::Known(user.clone()), &intervention) {
        tracing::debug!(
            user_id = user.id,
            intervention_id,
            "Chat join denied"
        );
        return StatusCode::FORBIDDEN.into_response();
    }

    tracing::info!(
        user_id = user.id,
        username = %user.username,
        intervention_id,
        "Chat session joining"
    );

    let handler = Arc::new(ChatSession::new(app_state.db_clone(), user, intervention_id));
    let rooms = app_state.rooms_clone();
    let room = RoomKey::Chat(intervention_id).path();
    let opts = WsServerOptions {
        ws_ping_sec: config::ws_ping_seconds(),
    };

    ws.on_upgrade(move |socket| serve_room(socket, rooms, room, handler, opts))
}
