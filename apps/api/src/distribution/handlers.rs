use axum::{
    extract::State,
    Json,
};
use serde::Deserialize;

use crate::distribution::PlaceDistribution;
use crate::errors::AppError;
use crate::extractors::AppQuery;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DistributionQuery {
    pub profession: Option<String>,
}

/// GET /api/distribution?profession=
pub async fn handle_distribution(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<DistributionQuery>,
) -> Result<Json<Vec<PlaceDistribution>>, AppError> {
    let profession = query.profession.unwrap_or_default();
    Ok(Json(state.distribution.distribution(&profession).await?))
}
