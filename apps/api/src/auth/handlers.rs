//! Axum route handlers for the mock Auth API.

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::session::{expired_session_cookie, session_cookie, session_id_from_headers};
use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::extractors::AppJson;
use crate::models::user::{NewUser, PublicUser};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub company_name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub user: PublicUser,
}

/// POST /api/auth/login
///
/// Exact email lookup and plaintext password comparison. On success a server
/// side session is opened and its id is set as the `sid` cookie.
pub async fn handle_login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(email), Some(password)) = (
        present(request.email.as_deref()),
        present(request.password.as_deref()),
    ) else {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    };

    let user = state
        .storage
        .get_user_by_email(email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if user.password != password {
        info!("Rejected login for user {}", user.id);
        return Err(AppError::InvalidCredentials);
    }

    let session_id = state.sessions.create(user.id).await;
    info!("User {} logged in", user.id);

    Ok((
        StatusCode::OK,
        [(SET_COOKIE, session_cookie(session_id))],
        Json(AuthResponse {
            message: "Login successful",
            user: user.into(),
        }),
    ))
}

/// POST /api/auth/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    AppJson(request): AppJson<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let new_user = validate_signup(request)?;

    if state
        .storage
        .get_user_by_email(&new_user.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "User with this email already exists".to_string(),
        ));
    }

    let user = state.storage.create_user(new_user).await?;
    info!("Created user {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully",
            user: user.into(),
        }),
    ))
}

/// POST /api/auth/logout
///
/// Idempotent: always answers 204 and expires the cookie.
pub async fn handle_logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Some(session_id) = session_id_from_headers(&headers) {
        state.sessions.remove(session_id).await;
    }
    (
        StatusCode::NO_CONTENT,
        [(SET_COOKIE, expired_session_cookie())],
    )
}

/// GET /api/auth/me
pub async fn handle_me(CurrentUser(user): CurrentUser) -> Json<PublicUser> {
    Json(user)
}

fn validate_signup(request: SignupRequest) -> Result<NewUser, AppError> {
    let required = |value: Option<String>, field: &str| {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::Validation(format!("{field} is required")))
    };

    let username = required(request.username, "username")?;
    let email = required(request.email, "email")?;
    let full_name = required(request.full_name, "fullName")?;
    // passwords are compared verbatim, so only reject blank ones
    let password = request
        .password
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| AppError::Validation("password is required".to_string()))?;

    if !is_plausible_email(&email) {
        return Err(AppError::Validation(
            "Please enter a valid email address".to_string(),
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    Ok(NewUser {
        username,
        email,
        full_name,
        company_name: request
            .company_name
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty()),
        password,
    })
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
