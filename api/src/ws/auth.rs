//! Credential resolution for WebSocket connections.
//!
//! Browsers cannot set headers on a WebSocket handshake, so the bearer token
//! arrives as a `?token=` query parameter. Resolution never fails with an
//! error: anything that does not decode to a live user yields
//! [`Identity::Anonymous`], and callers branch on that explicitly.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use sea_orm::DatabaseConnection;
use util::config;

use crate::auth::claims::Claims;
use db::models::user::{Model as UserModel, UserType};

/// The resolved caller of a WebSocket connection.
#[derive(Debug, Clone)]
pub enum Identity {
    /// No token, an invalid token, or a token for a user that no longer
    /// exists.
    Anonymous,
    /// A live user from the directory.
    Known(UserInfo),
}

/// The slice of a directory record the chat layer needs.
#[derive(Debug, Clone)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub user_type: UserType,
}

impl From<UserModel> for UserInfo {
    fn from(user: UserModel) -> Self {
        Self {
            id: user.id,
            username: user.username,
            user_type: user.user_type,
        }
    }
}

/// Validates `token` and looks the caller up in the user directory.
///
/// Read-only; the token's claims carry only the user id, so the role is
/// always taken from the directory at connection time.
pub async fn resolve_token(db: &DatabaseConnection, token: Option<&str>) -> Identity {
    let Some(token) = token else {
        return Identity::Anonymous;
    };

    let claims = match decode::<Claims>(
        token,
        &DecodingKey::from_secret(config::jwt_secret().as_bytes()),
        &Validation::new(Algorithm::HS256),
    ) {
        Ok(data) => data.claims,
        Err(e) => {
            tracing::debug!("WS token rejected: {e}");
            return Identity::Anonymous;
        }
    };

    match UserModel::find_by_id(db, claims.sub).await {
        Ok(Some(user)) => Identity::Known(user.into()),
        Ok(None) => {
            tracing::debug!("WS token for unknown user {}", claims.sub);
            Identity::Anonymous
        }
        Err(e) => {
            // Fail closed on directory errors.
            tracing::warn!(error = %e, "Directory lookup failed during WS auth");
            Identity::Anonymous
        }
    }
}
