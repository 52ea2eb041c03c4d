use axum::{Router, routing::get};
use util::state::AppState;

use crate::ws::notifications::handlers::notification_ws_handler;

pub mod events;
pub mod fanout;
pub mod handlers;
pub mod ws_handlers;

pub fn ws_notification_routes() -> Router<AppState> {
    Router::new().route("/", get(notification_ws_handler))
}
