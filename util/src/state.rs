//! Application state container shared across Axum route handlers.
//!
//! Holds the database connection and the room registry. It is cloned into
//! every handler via Axum's `State<T>` extractor.

use crate::ws::RoomRegistry;
use sea_orm::DatabaseConnection;

/// Central application state shared across the server.
///
/// This includes:
/// - A cloned, thread-safe database connection for use with SeaORM.
/// - The global `RoomRegistry` for joining and broadcasting to chat and
///   personal notification rooms.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    rooms: RoomRegistry,
}

impl AppState {
    /// Creates a new `AppState` with the given database connection and room registry.
    pub fn new(db: DatabaseConnection, rooms: RoomRegistry) -> Self {
        Self { db, rooms }
    }

    /// Returns a shared reference to the internal `DatabaseConnection`.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Returns a shared reference to the internal `RoomRegistry`.
    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    /// Returns a cloned copy of the database connection.
    ///
    /// Useful for async contexts or spawning tasks that require ownership.
    pub fn db_clone(&self) -> DatabaseConnection {
        self.db.clone()
    }

    /// Returns a cloned instance of the `RoomRegistry`.
    pub fn rooms_clone(&self) -> RoomRegistry {
        self.rooms.clone()
    }
}
