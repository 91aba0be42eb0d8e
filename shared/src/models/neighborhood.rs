//! Neighborhood Model (delivery fee reference set)

use serde::{Deserialize, Serialize};

/// Neighborhood entity
///
/// Read-only to the pricing core; managed by the back-office CRUD screens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Neighborhood {
    pub id: i64,
    pub name: String,
    /// Flat delivery fee for this neighborhood
    pub delivery_fee: f64,
    /// Estimated delivery time in minutes
    pub delivery_time_minutes: i32,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create neighborhood payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeighborhoodCreate {
    pub name: String,
    pub delivery_fee: f64,
    pub delivery_time_minutes: i32,
}

/// Update neighborhood payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeighborhoodUpdate {
    pub name: Option<String>,
    pub delivery_fee: Option<f64>,
    pub delivery_time_minutes: Option<i32>,
    pub is_active: Option<bool>,
}
