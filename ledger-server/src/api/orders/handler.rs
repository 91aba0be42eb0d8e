//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::order;
use crate::services::checkout::{self, CheckoutOutcome};
use crate::utils::{AppError, AppResult};
use shared::models::{CheckoutRequest, Order, OrderStatus, OrderStatusUpdate, PdvSaleRequest};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<OrderStatus>,
    #[serde(default = "default_limit")]
    pub limit: i32,
    #[serde(default)]
    pub offset: i32,
}

fn default_limit() -> i32 {
    50
}

/// GET /api/orders
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = order::find_all(&state.pool, query.status, query.limit, query.offset).await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let found = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
    Ok(Json(found))
}

/// POST /api/orders/checkout — delivery checkout
pub async fn checkout(
    State(state): State<ServerState>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<CheckoutOutcome>> {
    let outcome = checkout::submit_delivery_order(&state, payload).await?;
    Ok(Json(outcome))
}

/// POST /api/orders/pdv — in-person sale
pub async fn pdv_sale(
    State(state): State<ServerState>,
    Json(payload): Json<PdvSaleRequest>,
) -> AppResult<Json<CheckoutOutcome>> {
    let outcome = checkout::submit_pdv_sale(&state, payload).await?;
    Ok(Json(outcome))
}

/// PUT /api/orders/:id/status
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<Order>> {
    let updated = order::update_status(&state.pool, id, payload.status).await?;
    Ok(Json(updated))
}
