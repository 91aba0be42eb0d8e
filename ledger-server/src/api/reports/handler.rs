//! Report API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::daily_report;
use crate::services::reporting;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};
use shared::models::{DailyReport, DailyReportGenerate, MonthlyReport};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i32,
    #[serde(default)]
    pub offset: i32,
}

fn default_limit() -> i32 {
    31
}

/// GET /api/reports/daily
pub async fn list_daily(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<DailyReport>>> {
    let reports = daily_report::find_all(
        &state.pool,
        &state.config.store_id,
        query.limit,
        query.offset,
    )
    .await?;
    Ok(Json(reports))
}

/// GET /api/reports/daily/:date
pub async fn get_daily(
    State(state): State<ServerState>,
    Path(date): Path<String>,
) -> AppResult<Json<DailyReport>> {
    let report = daily_report::find_by_date(&state.pool, &state.config.store_id, &date)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No daily report for {date}")))?;
    Ok(Json(report))
}

/// POST /api/reports/daily — generate (or regenerate) a day's rollup
pub async fn generate_daily(
    State(state): State<ServerState>,
    Json(payload): Json<DailyReportGenerate>,
) -> AppResult<Json<DailyReport>> {
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;
    let report = reporting::generate_daily(&state, payload).await?;
    Ok(Json(report))
}

/// GET /api/reports/monthly/:month — computed on demand
pub async fn monthly(
    State(state): State<ServerState>,
    Path(month): Path<String>,
) -> AppResult<Json<MonthlyReport>> {
    let report = reporting::monthly(&state, &month).await?;
    Ok(Json(report))
}
