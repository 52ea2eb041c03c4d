use std::convert::Infallible;

use api::ws::ws_routes;
use axum::{Router, body::Body, http::Request, response::Response};
use ctor::ctor;
use db::models::user::{Model as UserModel, UserType};
use db::test_utils::setup_test_db;
use sea_orm::DatabaseConnection;
use tower::ServiceExt;
use tower::util::BoxCloneService;
use util::state::AppState;
use util::ws::RoomRegistry;

#[ctor]
fn setup_tests() {
    // Config is a process-wide singleton read on first access; the required
    // variables must exist before any test touches it.
    unsafe {
        std::env::set_var("JWT_SECRET", "test-secret");
        std::env::set_var("DATABASE_PATH", "sqlite::memory:");
    }
}

/// A fresh app over a fresh in-memory database. Every test gets its own, so
/// tests never share rooms or rows.
pub async fn make_test_app() -> (
    BoxCloneService<Request<Body>, Response, Infallible>,
    AppState,
) {
    let db = setup_test_db().await;
    let app_state = AppState::new(db, RoomRegistry::new());

    let router = Router::new().nest("/ws", ws_routes(app_state.clone()));
    (router.into_service().boxed_clone(), app_state)
}

pub struct TestUsers {
    pub client: UserModel,
    pub employee: UserModel,
    pub admin: UserModel,
    pub other_client: UserModel,
}

pub async fn seed_users(db: &DatabaseConnection) -> TestUsers {
    let client = UserModel::create(db, "alice", "alice@test.com", "password123", UserType::Client)
        .await
        .unwrap();
    let employee = UserModel::create(db, "bob", "bob@test.com", "password123", UserType::Employee)
        .await
        .unwrap();
    let admin = UserModel::create(db, "carol", "carol@test.com", "password123", UserType::Admin)
        .await
        .unwrap();
    let other_client = UserModel::create(db, "mallory", "mallory@test.com", "password123", UserType::Client)
        .await
        .unwrap();
    TestUsers {
        client,
        employee,
        admin,
        other_client,
    }
}
