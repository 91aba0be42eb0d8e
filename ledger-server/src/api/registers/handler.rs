//! Cash Register API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::cash_register;
use crate::registers;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{
    CashEntry, CashEntryCreate, CashRegister, CashRegisterSummary, RegisterClose, RegisterOpen,
};

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

/// GET /api/registers
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<CashRegister>>> {
    let registers = cash_register::find_all(&state.pool, query.limit, query.offset).await?;
    Ok(Json(registers))
}

/// GET /api/registers/current — the open register, if any
pub async fn get_current(
    State(state): State<ServerState>,
) -> AppResult<Json<Option<CashRegister>>> {
    let current = cash_register::find_open(&state.pool, &state.config.store_id).await?;
    Ok(Json(current))
}

/// GET /api/registers/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<CashRegister>> {
    let register = cash_register::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Cash register {id} not found")))?;
    Ok(Json(register))
}

/// POST /api/registers — abertura
pub async fn open(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterOpen>,
) -> AppResult<Json<CashRegister>> {
    validate_required_text(&payload.operator_name, "operator_name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;
    registers::validate_session_amount(payload.opening_amount, "opening_amount")?;

    let register = cash_register::open(&state.pool, &state.config.store_id, payload).await?;

    tracing::info!(
        register_id = register.id,
        opening_amount = register.opening_amount,
        operator = %register.operator_name,
        "Cash register opened"
    );

    Ok(Json(register))
}

/// POST /api/registers/entries — manual income/expense on the open register
pub async fn add_entry(
    State(state): State<ServerState>,
    Json(payload): Json<CashEntryCreate>,
) -> AppResult<Json<CashEntry>> {
    validate_required_text(&payload.description, "description", MAX_NOTE_LEN)?;
    registers::validate_entry_amount(payload.amount)?;

    let entry =
        cash_register::add_manual_entry(&state.pool, &state.config.store_id, payload).await?;
    Ok(Json(entry))
}

/// GET /api/registers/:id/entries
pub async fn list_entries(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<CashEntry>>> {
    // 404 on a bad ID, not an empty list
    cash_register::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Cash register {id} not found")))?;

    let entries = cash_register::list_entries(&state.pool, id).await?;
    Ok(Json(entries))
}

/// GET /api/registers/:id/summary — live reconciliation view
pub async fn summary(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<CashRegisterSummary>> {
    let register = cash_register::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Cash register {id} not found")))?;
    let entries = cash_register::list_entries(&state.pool, id).await?;

    Ok(Json(registers::summarize(&register, &entries)))
}

/// POST /api/registers/:id/close — fechamento
pub async fn close(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<RegisterClose>,
) -> AppResult<Json<CashRegister>> {
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;
    registers::validate_session_amount(payload.closing_amount, "closing_amount")?;

    let register = cash_register::close(&state.pool, id, payload).await?;

    tracing::info!(
        register_id = register.id,
        closing_amount = register.closing_amount,
        expected_balance = register.expected_balance,
        difference = register.difference,
        "Cash register closed"
    );

    Ok(Json(register))
}
