//! Daily Report Repository
//!
//! Regeneration replaces the stored row for the date (delete + insert in
//! one transaction), keeping the rollup idempotent across reruns.

use super::RepoResult;
use shared::models::{ChannelSummary, DailyReport, PaymentBreakdown};
use sqlx::SqlitePool;

const REPORT_SELECT: &str = "SELECT id, store_id, business_date, total_transactions, delivery_orders, pdv_orders, table_sales, gross_sales, delivery_fees, discounts, cashback_redeemed, cashback_earned, ticket_average, channel_breakdowns, payment_breakdowns, generated_at, note FROM daily_report";

#[derive(sqlx::FromRow)]
struct DailyReportRow {
    id: i64,
    store_id: String,
    business_date: String,
    total_transactions: i32,
    delivery_orders: i32,
    pdv_orders: i32,
    table_sales: i32,
    gross_sales: f64,
    delivery_fees: f64,
    discounts: f64,
    cashback_redeemed: f64,
    cashback_earned: f64,
    ticket_average: f64,
    channel_breakdowns: String,
    payment_breakdowns: String,
    generated_at: i64,
    note: Option<String>,
}

impl DailyReportRow {
    fn into_report(self) -> RepoResult<DailyReport> {
        let channel_breakdowns: Vec<ChannelSummary> =
            serde_json::from_str(&self.channel_breakdowns)?;
        let payment_breakdowns: Vec<PaymentBreakdown> =
            serde_json::from_str(&self.payment_breakdowns)?;
        Ok(DailyReport {
            id: self.id,
            store_id: self.store_id,
            business_date: self.business_date,
            total_transactions: self.total_transactions,
            delivery_orders: self.delivery_orders,
            pdv_orders: self.pdv_orders,
            table_sales: self.table_sales,
            gross_sales: self.gross_sales,
            delivery_fees: self.delivery_fees,
            discounts: self.discounts,
            cashback_redeemed: self.cashback_redeemed,
            cashback_earned: self.cashback_earned,
            ticket_average: self.ticket_average,
            channel_breakdowns,
            payment_breakdowns,
            generated_at: self.generated_at,
            note: self.note,
        })
    }
}

/// Store a generated report, replacing any previous run for the same date.
pub async fn upsert(pool: &SqlitePool, mut report: DailyReport) -> RepoResult<DailyReport> {
    report.id = shared::util::snowflake_id();
    let channel_json = serde_json::to_string(&report.channel_breakdowns)?;
    let payment_json = serde_json::to_string(&report.payment_breakdowns)?;

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM daily_report WHERE store_id = ? AND business_date = ?")
        .bind(&report.store_id)
        .bind(&report.business_date)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        "INSERT INTO daily_report (id, store_id, business_date, total_transactions, delivery_orders, pdv_orders, table_sales, gross_sales, delivery_fees, discounts, cashback_redeemed, cashback_earned, ticket_average, channel_breakdowns, payment_breakdowns, generated_at, note) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
    )
    .bind(report.id)
    .bind(&report.store_id)
    .bind(&report.business_date)
    .bind(report.total_transactions)
    .bind(report.delivery_orders)
    .bind(report.pdv_orders)
    .bind(report.table_sales)
    .bind(report.gross_sales)
    .bind(report.delivery_fees)
    .bind(report.discounts)
    .bind(report.cashback_redeemed)
    .bind(report.cashback_earned)
    .bind(report.ticket_average)
    .bind(channel_json)
    .bind(payment_json)
    .bind(report.generated_at)
    .bind(&report.note)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(report)
}

pub async fn find_by_date(
    pool: &SqlitePool,
    store_id: &str,
    business_date: &str,
) -> RepoResult<Option<DailyReport>> {
    let sql = format!("{REPORT_SELECT} WHERE store_id = ? AND business_date = ? LIMIT 1");
    let row = sqlx::query_as::<_, DailyReportRow>(&sql)
        .bind(store_id)
        .bind(business_date)
        .fetch_optional(pool)
        .await?;
    row.map(DailyReportRow::into_report).transpose()
}

pub async fn find_all(
    pool: &SqlitePool,
    store_id: &str,
    limit: i32,
    offset: i32,
) -> RepoResult<Vec<DailyReport>> {
    let sql =
        format!("{REPORT_SELECT} WHERE store_id = ? ORDER BY business_date DESC LIMIT ? OFFSET ?");
    let rows = sqlx::query_as::<_, DailyReportRow>(&sql)
        .bind(store_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    rows.into_iter().map(DailyReportRow::into_report).collect()
}
