//! Daily/Monthly Report Model

use super::cash_register::SaleChannel;
use super::order::PaymentMethod;
use serde::{Deserialize, Serialize};

/// Per channel slice of a report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelSummary {
    pub channel: SaleChannel,
    pub total: f64,
    pub count: i32,
    /// count / total transaction count; 0 when there were no transactions
    pub percentage: f64,
}

/// Per payment method slice of a report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    pub method: PaymentMethod,
    pub total: f64,
    pub count: i32,
}

/// Daily rollup, persisted once per business date per store.
///
/// Regenerating for the same date replaces the stored row; the fold is pure
/// and never accumulates across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReport {
    pub id: i64,
    pub store_id: String,
    /// Business date (YYYY-MM-DD), cutoff-aware
    pub business_date: String,
    pub total_transactions: i32,
    pub delivery_orders: i32,
    pub pdv_orders: i32,
    pub table_sales: i32,
    /// Completed revenue across all channels
    pub gross_sales: f64,
    pub delivery_fees: f64,
    pub discounts: f64,
    pub cashback_redeemed: f64,
    pub cashback_earned: f64,
    /// gross_sales / total_transactions; 0 when there were none
    pub ticket_average: f64,
    pub channel_breakdowns: Vec<ChannelSummary>,
    pub payment_breakdowns: Vec<PaymentBreakdown>,
    pub generated_at: i64,
    pub note: Option<String>,
}

/// Monthly rollup, computed on demand (not persisted)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub store_id: String,
    /// Month (YYYY-MM)
    pub month: String,
    /// Distinct business dates with at least one transaction
    pub active_days: i32,
    pub total_transactions: i32,
    pub gross_sales: f64,
    pub ticket_average: f64,
    pub channel_breakdowns: Vec<ChannelSummary>,
    pub payment_breakdowns: Vec<PaymentBreakdown>,
}

/// Generate daily report request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReportGenerate {
    pub business_date: String,
    pub note: Option<String>,
}
