//! Product API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::product;
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text};
use crate::utils::{AppError, AppResult};
use shared::models::{Product, ProductCreate, ProductUpdate};

/// GET /api/products
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    let products = product::find_all(&state.pool).await?;
    Ok(Json(products))
}

/// GET /api/products/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    let found = product::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))?;
    Ok(Json(found))
}

/// POST /api/products
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let created = product::create(&state.pool, payload).await?;
    Ok(Json(created))
}

/// PUT /api/products/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let updated = product::update(&state.pool, id, payload).await?;
    Ok(Json(updated))
}

/// DELETE /api/products/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    Ok(Json(product::delete(&state.pool, id).await?))
}
