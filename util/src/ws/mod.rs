pub mod handler_trait;
pub mod manager;
pub mod runtime;
pub mod serve;

pub use manager::RoomRegistry;
