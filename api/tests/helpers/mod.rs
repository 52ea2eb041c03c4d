pub mod app;
pub mod ws;

pub use app::{TestUsers, make_test_app, seed_users};
pub use ws::{connect_ws, next_json, spawn_server};
