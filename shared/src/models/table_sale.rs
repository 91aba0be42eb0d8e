//! Table Sale Model (table service)

use super::order::PaymentMethod;
use serde::{Deserialize, Serialize};

/// Table sale lifecycle (aberta -> fechada | cancelada)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum TableSaleStatus {
    Open,
    Closed,
    Cancelled,
}

/// Table sale item, keyed by product code; quantity may be a weight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSaleItem {
    pub product_code: String,
    pub name: String,
    /// Unit count or weight in kg for weighed products
    pub quantity: f64,
    pub unit_price: f64,
    /// unit_price * quantity, rounded to 2 dp
    pub subtotal: f64,
}

/// Table sale entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSale {
    pub id: i64,
    pub table_number: i32,
    pub items: Vec<TableSaleItem>,
    /// Sum of item subtotals
    pub subtotal: f64,
    pub discount_amount: f64,
    /// subtotal - discount_amount, never negative
    pub total_amount: f64,
    pub payment_method: Option<PaymentMethod>,
    /// Change returned to the customer on cash payments
    pub change_amount: Option<f64>,
    pub status: TableSaleStatus,
    pub opened_at: i64,
    pub closed_at: Option<i64>,
}

/// Open table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSaleOpen {
    pub table_number: i32,
}

/// Replace the item list of an open table sale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSaleItemInput {
    pub product_code: String,
    pub name: String,
    pub quantity: f64,
    pub unit_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSaleSetItems {
    pub items: Vec<TableSaleItemInput>,
}

/// Close table payload (payment)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSaleClose {
    pub discount_amount: Option<f64>,
    pub payment_method: PaymentMethod,
    /// Cash tendered by the customer; change is computed from it
    pub amount_tendered: Option<f64>,
}
