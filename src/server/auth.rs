//! Bearer-token authentication.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use super::{AppState, HttpError};
use crate::storage::SessionStore;

/// The authenticated user's id, resolved from `Authorization: Bearer <token>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub String);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(HttpError::unauthorized)?;

        let store = state.store.lock().await;
        match store.session_user(token)? {
            Some(user_id) => Ok(CurrentUser(user_id)),
            None => {
                tracing::debug!("rejected unknown or expired session");
                Err(HttpError::unauthorized())
            }
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
