//! Table Sale API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::table_sale;
use crate::services::tables;
use crate::utils::{AppError, AppResult};
use shared::models::{TableSale, TableSaleClose, TableSaleOpen, TableSaleSetItems};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i32,
    #[serde(default)]
    pub offset: i32,
}

fn default_limit() -> i32 {
    50
}

/// GET /api/tables
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<TableSale>>> {
    let sales = table_sale::find_all(&state.pool, query.limit, query.offset).await?;
    Ok(Json(sales))
}

/// GET /api/tables/open — currently open tables
pub async fn list_open(State(state): State<ServerState>) -> AppResult<Json<Vec<TableSale>>> {
    let sales = table_sale::find_open(&state.pool).await?;
    Ok(Json(sales))
}

/// GET /api/tables/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<TableSale>> {
    let sale = table_sale::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Table sale {id} not found")))?;
    Ok(Json(sale))
}

/// POST /api/tables — open a table
pub async fn open(
    State(state): State<ServerState>,
    Json(payload): Json<TableSaleOpen>,
) -> AppResult<Json<TableSale>> {
    let sale = tables::open_table(&state, payload).await?;
    Ok(Json(sale))
}

/// PUT /api/tables/:id/items — replace the item list
pub async fn set_items(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<TableSaleSetItems>,
) -> AppResult<Json<TableSale>> {
    let sale = tables::set_items(&state, id, payload).await?;
    Ok(Json(sale))
}

/// POST /api/tables/:id/close — pay and close
pub async fn close(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<TableSaleClose>,
) -> AppResult<Json<TableSale>> {
    let sale = tables::close_table(&state, id, payload).await?;
    Ok(Json(sale))
}

/// POST /api/tables/:id/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<TableSale>> {
    let sale = tables::cancel_table(&state, id).await?;
    Ok(Json(sale))
}
