//! Cash Register Model (caixa)

use super::order::PaymentMethod;
use serde::{Deserialize, Serialize};

/// Register status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum RegisterStatus {
    Open,
    Closed,
}

impl Default for RegisterStatus {
    fn default() -> Self {
        Self::Open
    }
}

/// Entry direction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum EntryType {
    Income,
    Expense,
}

/// Sales origin of a register entry, set at entry-creation time.
///
/// Replaces the legacy convention of inferring the channel from the entry
/// description text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum SaleChannel {
    Pdv,
    Delivery,
    Table,
    /// Manual income/expense posted by an operator (not a sale)
    Manual,
}

impl SaleChannel {
    /// Whether entries on this channel count toward sales totals.
    pub fn is_sale(&self) -> bool {
        !matches!(self, SaleChannel::Manual)
    }
}

/// Cash register session (caixa)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CashRegister {
    pub id: i64,
    pub store_id: String,
    #[serde(default)]
    pub status: RegisterStatus,
    /// Cash placed in the drawer at opening
    pub opening_amount: f64,
    /// Counted cash at closing; null while open
    pub closing_amount: Option<f64>,
    /// opening + cash income - cash expense, frozen at close
    pub expected_balance: Option<f64>,
    /// closing_amount - expected_balance, frozen at close
    pub difference: Option<f64>,
    pub operator_name: String,
    pub opened_at: i64,
    pub closed_at: Option<i64>,
    pub note: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Register entry (sale, manual income, or expense)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CashEntry {
    pub id: i64,
    pub register_id: i64,
    pub entry_type: EntryType,
    pub channel: SaleChannel,
    pub payment_method: PaymentMethod,
    /// Always positive; entry_type determines the direction
    pub amount: f64,
    pub description: String,
    /// Order/table sale that produced this entry, when applicable
    pub source_id: Option<i64>,
    pub created_at: i64,
}

/// Open register payload (abertura)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterOpen {
    pub operator_name: String,
    pub opening_amount: f64,
    pub note: Option<String>,
}

/// Close register payload (fechamento)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterClose {
    pub closing_amount: f64,
    pub note: Option<String>,
}

/// Manual entry payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashEntryCreate {
    pub entry_type: EntryType,
    pub payment_method: PaymentMethod,
    pub amount: f64,
    pub description: String,
}

/// Per payment method totals within one register session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodBreakdown {
    pub method: PaymentMethod,
    pub income: f64,
    pub expense: f64,
    pub count: i32,
}

/// Per channel sales totals within one register session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelBreakdown {
    pub channel: SaleChannel,
    pub income: f64,
    pub count: i32,
}

/// Derived reconciliation view of one register session.
///
/// Not persisted as its own row; recomputed from the entries on demand and
/// frozen into `expected_balance`/`difference` when the register closes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashRegisterSummary {
    pub register_id: i64,
    pub opening_amount: f64,
    /// All income entries, any payment method
    pub income_total: f64,
    /// All expense entries, any payment method
    pub expense_total: f64,
    /// Income on sale channels (PDV, delivery, table), any payment method
    pub sales_total: f64,
    /// Income entries paid in physical cash
    pub cash_income: f64,
    /// Expense entries paid in physical cash
    pub cash_expense: f64,
    /// opening + cash_income - cash_expense
    pub expected_balance: f64,
    pub closing_amount: Option<f64>,
    /// closing_amount - expected_balance, once closed
    pub difference: Option<f64>,
    pub by_method: Vec<MethodBreakdown>,
    pub by_channel: Vec<ChannelBreakdown>,
}
