use axum::{Router, routing::get};
use util::state::AppState;

use crate::ws::chat::handlers::chat_ws_handler;

pub mod common;
pub mod events;
pub mod handlers;
pub mod ws_handlers;

pub fn ws_chat_routes() -> Router<AppState> {
    Router::new().route("/{intervention_id}", get(chat_ws_handler))
}
