// Mock authentication: plaintext password comparison and an in-memory
// session table keyed by a cookie. Not a security model.

pub mod handlers;
pub mod session;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::errors::AppError;
use crate::models::user::PublicUser;
use crate::state::AppState;

/// The logged-in user behind the request's `sid` cookie.
/// Rejects with 401 when the cookie is missing, unknown, or points at a deleted user.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub PublicUser);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let session_id =
            session::session_id_from_headers(&parts.headers).ok_or(AppError::Unauthorized)?;
        let user_id = state
            .sessions
            .resolve(session_id)
            .await
            .ok_or(AppError::Unauthorized)?;
        let user = state
            .storage
            .get_user(user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;
        Ok(CurrentUser(user.into()))
    }
}
