pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::cv::handlers::{self as cv, UPLOAD_BODY_LIMIT};
use crate::distribution::handlers as distribution;
use crate::state::AppState;
use crate::talent::handlers as talent;

pub fn build_router(state: AppState) -> Router {
    let uploads = Router::new()
        .route("/api/cv/upload", post(cv::upload_cv))
        .route("/api/public/cv/upload", post(cv::upload_public_cv))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT));

    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/auth/login", post(auth::handle_login))
        .route("/api/auth/signup", post(auth::handle_signup))
        .route("/api/auth/logout", post(auth::handle_logout))
        .route("/api/auth/me", get(auth::handle_me))
        // Talent queries
        .route("/api/candidates", get(talent::list_candidates))
        .route("/api/candidates/:id", get(talent::get_candidate))
        .route("/api/filters-data", get(talent::filters_data))
        .route("/api/hotspots", get(talent::hotspots))
        // CVs
        .merge(uploads)
        .route("/api/cv", get(cv::list_cvs))
        .route("/api/cv/:id/status", get(cv::cv_status))
        // Profession distribution
        .route("/api/distribution", get(distribution::handle_distribution))
        .with_state(state)
}
