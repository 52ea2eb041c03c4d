use axum::http::StatusCode;
use sea_orm::DbErr;

/// Failure taxonomy for the chat gateway.
///
/// Connection-time failures map to a bare HTTP status (no body, so an
/// unauthorized caller learns nothing about whether the room exists).
/// Frame-time failures are rendered as an `error` event to the sender only.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("The message store is unavailable. Please try again.")]
    Store(#[from] DbErr),
}

impl ChatError {
    /// Status for failures that occur before the WebSocket upgrade.
    pub fn connect_status(&self) -> StatusCode {
        match self {
            ChatError::Unauthenticated => StatusCode::UNAUTHORIZED,
            // NotFound is folded into Forbidden at the boundary so probing
            // for intervention ids reveals nothing.
            ChatError::Forbidden(_) | ChatError::NotFound(_) => StatusCode::FORBIDDEN,
            ChatError::Validation(_) => StatusCode::BAD_REQUEST,
            ChatError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}
