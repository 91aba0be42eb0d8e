//! Customer API Handlers
//!
//! The attendant flow looks customers up by phone to show the cashback
//! balance before applying a redemption.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::{cashback, customer};
use crate::utils::validation::{MAX_NAME_LEN, validate_phone, validate_required_text};
use crate::utils::{AppError, AppResult};
use shared::models::{CashbackTransaction, Customer, CustomerCreate, CustomerUpdate};

/// GET /api/customers
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Customer>>> {
    let customers = customer::find_all(&state.pool).await?;
    Ok(Json(customers))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// GET /api/customers/search?q=...
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Customer>>> {
    let customers = customer::search(&state.pool, &query.q).await?;
    Ok(Json(customers))
}

/// GET /api/customers/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Customer>> {
    let found = customer::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Customer {id} not found")))?;
    Ok(Json(found))
}

/// GET /api/customers/by-phone/:phone — exact match on the normalized number
pub async fn get_by_phone(
    State(state): State<ServerState>,
    Path(phone): Path<String>,
) -> AppResult<Json<Customer>> {
    let normalized = validate_phone(&phone)?;
    let found = customer::find_by_phone(&state.pool, &normalized)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No customer with phone {normalized}")))?;
    Ok(Json(found))
}

#[derive(Debug, Deserialize)]
pub struct TransactionsQuery {
    #[serde(default = "default_limit")]
    pub limit: i32,
}

fn default_limit() -> i32 {
    50
}

/// GET /api/customers/:id/transactions — cashback history
pub async fn transactions(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<TransactionsQuery>,
) -> AppResult<Json<Vec<CashbackTransaction>>> {
    let rows = cashback::list_by_customer(&state.pool, id, query.limit).await?;
    Ok(Json(rows))
}

/// POST /api/customers
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CustomerCreate>,
) -> AppResult<Json<Customer>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    let phone = validate_phone(&payload.phone)?;

    let created = customer::create(
        &state.pool,
        CustomerCreate {
            name: payload.name,
            phone,
        },
    )
    .await?;
    Ok(Json(created))
}

/// PUT /api/customers/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(mut payload): Json<CustomerUpdate>,
) -> AppResult<Json<Customer>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(phone) = &payload.phone {
        payload.phone = Some(validate_phone(phone)?);
    }

    let updated = customer::update(&state.pool, id, payload).await?;
    Ok(Json(updated))
}
