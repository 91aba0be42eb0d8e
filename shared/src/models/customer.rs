//! Customer Model

use serde::{Deserialize, Serialize};

/// Customer entity
///
/// The normalized 11-digit phone is the dedup key: checkout looks customers
/// up by phone and creates the record on first purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub name: String,
    /// Normalized phone: exactly 11 digits (DDD + number)
    pub phone: String,
    /// Cashback balance available for redemption, never negative
    pub available_balance: f64,
    pub total_spent: f64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create customer payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerCreate {
    pub name: String,
    pub phone: String,
}

/// Update customer payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}
