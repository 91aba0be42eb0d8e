//! Reporting service: collect finalized sales and fold them into reports
//!
//! Source queries do the filtering (cancelled orders and non-closed table
//! sales never reach the fold), so regenerating a report is a pure replay.

use chrono::NaiveDate;
use shared::models::{
    DailyReport, DailyReportGenerate, MonthlyReport, OrderChannel, PaymentMethod, SaleChannel,
};

use crate::core::ServerState;
use crate::db::repository::{daily_report, order, table_sale};
use crate::reports::{self, SaleRecord};
use crate::utils::AppResult;
use crate::utils::time;

/// Generate (or regenerate) the daily report for a business date.
pub async fn generate_daily(
    state: &ServerState,
    req: DailyReportGenerate,
) -> AppResult<DailyReport> {
    let date = time::parse_date(&req.business_date)?;
    time::validate_not_future(date, state.config.timezone)?;

    let cutoff = state.config.business_day_cutoff;
    let (start, end) = time::business_day_bounds(date, cutoff, state.config.timezone);
    let records = collect_records(state, start, end).await?;

    let report = reports::fold_daily(
        &state.config.store_id,
        &req.business_date,
        &records,
        shared::util::now_millis(),
        req.note,
    );

    Ok(daily_report::upsert(&state.pool, report).await?)
}

/// Compute the monthly rollup on demand (never persisted).
pub async fn monthly(state: &ServerState, month: &str) -> AppResult<MonthlyReport> {
    let first_day: NaiveDate = time::parse_month(month)?;
    let cutoff = state.config.business_day_cutoff;
    let (start, end) = time::month_bounds(first_day, cutoff, state.config.timezone);
    let records = collect_records(state, start, end).await?;

    Ok(reports::fold_monthly(&state.config.store_id, month, &records))
}

/// Pull every finalized transaction in the window into the unified
/// `SaleRecord` shape.
async fn collect_records(
    state: &ServerState,
    start_millis: i64,
    end_millis: i64,
) -> AppResult<Vec<SaleRecord>> {
    let cutoff = state.config.business_day_cutoff;
    let tz = state.config.timezone;

    let orders = order::find_for_rollup(&state.pool, start_millis, end_millis).await?;
    let table_sales = table_sale::find_for_rollup(&state.pool, start_millis, end_millis).await?;

    let mut records = Vec::with_capacity(orders.len() + table_sales.len());

    for o in orders {
        let channel = match o.channel {
            OrderChannel::Delivery => SaleChannel::Delivery,
            OrderChannel::Pdv => SaleChannel::Pdv,
        };
        records.push(SaleRecord {
            channel,
            payment_method: o.payment_method,
            amount: o.total_amount,
            delivery_fee: o.delivery_fee,
            discount: 0.0,
            cashback_applied: o.cashback_applied,
            cashback_earned: o.cashback_earned,
            business_date: time::business_date_of(o.created_at, cutoff, tz)
                .format("%Y-%m-%d")
                .to_string(),
        });
    }

    for sale in table_sales {
        // Closed sales always carry a method; default defensively to cash
        let method = sale.payment_method.unwrap_or(PaymentMethod::Money);
        let closed_at = sale.closed_at.unwrap_or(sale.opened_at);
        records.push(SaleRecord {
            channel: SaleChannel::Table,
            payment_method: method,
            amount: sale.total_amount,
            delivery_fee: 0.0,
            discount: sale.discount_amount,
            cashback_applied: 0.0,
            cashback_earned: 0.0,
            business_date: time::business_date_of(closed_at, cutoff, tz)
                .format("%Y-%m-%d")
                .to_string(),
        });
    }

    Ok(records)
}
