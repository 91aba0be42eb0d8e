//! Cashback Model

use serde::{Deserialize, Serialize};

/// Cashback transaction kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum CashbackType {
    /// Earned from a paid order (percentage of the payable total)
    Purchase,
    /// Balance consumed to reduce a new order's payable amount
    Redemption,
}

/// Cashback ledger row
///
/// `balance_after` snapshots the customer balance as of this transaction so
/// the history is auditable without replaying the whole ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CashbackTransaction {
    pub id: i64,
    pub customer_id: i64,
    /// Order that produced this transaction
    pub order_id: Option<i64>,
    #[cfg_attr(feature = "db", sqlx(rename = "transaction_type"))]
    #[serde(rename = "transaction_type")]
    pub kind: CashbackType,
    /// Always positive; the kind determines the direction
    pub amount: f64,
    pub balance_after: f64,
    pub description: Option<String>,
    pub created_at: i64,
}
