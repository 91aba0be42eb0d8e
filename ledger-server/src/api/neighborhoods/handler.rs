//! Neighborhood API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::neighborhood;
use crate::delivery::{self, FeeQuote};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};
use shared::models::{Neighborhood, NeighborhoodCreate, NeighborhoodUpdate};

/// GET /api/neighborhoods
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Neighborhood>>> {
    let neighborhoods = neighborhood::find_all(&state.pool).await?;
    Ok(Json(neighborhoods))
}

/// GET /api/neighborhoods/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Neighborhood>> {
    let found = neighborhood::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Neighborhood {id} not found")))?;
    Ok(Json(found))
}

#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    pub neighborhood: String,
}

/// GET /api/neighborhoods/quote?neighborhood=Centro
///
/// Fee + ETA quote for the storefront checkout. Unknown neighborhoods fall
/// back to a zero fee unless the server is configured to block them.
pub async fn quote(
    State(state): State<ServerState>,
    Query(query): Query<QuoteQuery>,
) -> AppResult<Json<FeeQuote>> {
    validate_required_text(&query.neighborhood, "neighborhood", MAX_NAME_LEN)?;

    let found = neighborhood::find_by_name(&state.pool, &query.neighborhood).await?;
    let fee_quote = delivery::resolve(found.as_ref(), state.config.default_delivery_eta_minutes);

    if !fee_quote.matched && state.config.block_unknown_neighborhood {
        return Err(AppError::validation(format!(
            "neighborhood '{}' is not served",
            query.neighborhood
        )));
    }
    Ok(Json(fee_quote))
}

/// POST /api/neighborhoods
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<NeighborhoodCreate>,
) -> AppResult<Json<Neighborhood>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    let created = neighborhood::create(&state.pool, payload).await?;
    Ok(Json(created))
}

/// PUT /api/neighborhoods/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<NeighborhoodUpdate>,
) -> AppResult<Json<Neighborhood>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    let updated = neighborhood::update(&state.pool, id, payload).await?;
    Ok(Json(updated))
}

/// DELETE /api/neighborhoods/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    Ok(Json(neighborhood::delete(&state.pool, id).await?))
}
