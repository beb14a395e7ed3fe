//! Axum route handlers for the Query/Filtering API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use tracing::debug;

use crate::errors::AppError;
use crate::extractors::AppQuery;
use crate::models::candidate::Candidate;
use crate::state::AppState;
use crate::talent::filters::{resolve_filter_options, resolve_for_role, FilterOptions};
use crate::talent::hotspots::{talent_hotspots, Hotspot};
use crate::talent::query::CandidateFilter;

#[derive(Debug, Deserialize)]
pub struct FiltersDataQuery {
    pub role: Option<String>,
}

/// GET /api/candidates?role=&skill=&institution=
pub async fn list_candidates(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<CandidateFilter>,
) -> Result<Json<Vec<Candidate>>, AppError> {
    let candidates = state.storage.filter_candidates(&filter).await?;
    debug!("Candidate query {:?} matched {}", filter, candidates.len());
    Ok(Json(candidates))
}

/// GET /api/candidates/:id
pub async fn get_candidate(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Candidate>, AppError> {
    let id: i32 = raw_id
        .trim()
        .parse()
        .map_err(|_| AppError::Validation("Invalid candidate ID".to_string()))?;

    state
        .storage
        .get_candidate(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Candidate not found".to_string()))
}

/// GET /api/filters-data?role=
///
/// Without a role: every distinct role, skill and institution. With a role:
/// skills and institutions of the matching candidates only.
pub async fn filters_data(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<FiltersDataQuery>,
) -> Result<Json<FilterOptions>, AppError> {
    let candidates = state.storage.all_candidates().await?;
    let role = query.role.as_deref().map(str::trim).filter(|r| !r.is_empty());
    let options = match role {
        Some(role) => resolve_for_role(&candidates, role),
        None => resolve_filter_options(&candidates),
    };
    Ok(Json(options))
}

/// GET /api/hotspots?role=&skill=&institution=
pub async fn hotspots(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<CandidateFilter>,
) -> Result<Json<Vec<Hotspot>>, AppError> {
    let candidates = state.storage.filter_candidates(&filter).await?;
    Ok(Json(talent_hotspots(&candidates)))
}
