use axum::Router;
use util::state::AppState;

use crate::ws::{chat::ws_chat_routes, notifications::ws_notification_routes};

pub mod access;
pub mod auth;
pub mod chat;
pub mod error;
pub mod notifications;
pub mod rooms;

pub fn ws_routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/chat", ws_chat_routes())
        .nest("/notifications", ws_notification_routes())
        .with_state(app_state)
}
