//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity (catalog item: açaí bowl, milkshake, etc.)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Base price, used when no size is selected
    pub price: f64,
    pub category: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
    /// Size options; a selected size replaces the base price entirely
    #[serde(default)]
    pub sizes: Vec<ProductSize>,
    /// Complement options; selected complements add on top of the base
    #[serde(default)]
    pub complements: Vec<ProductComplement>,
}

/// Size option of a product (300ml, 500ml, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductSize {
    pub id: i64,
    pub product_id: i64,
    pub name: String,
    /// Replaces the product base price when selected
    pub price: f64,
}

/// Complement option of a product (granola, condensed milk, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductComplement {
    pub id: i64,
    pub product_id: i64,
    pub name: String,
    /// Surcharge added on top of whichever base price applies
    pub price: f64,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub price: f64,
    pub category: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub sizes: Vec<ProductSizeInput>,
    #[serde(default)]
    pub complements: Vec<ProductComplementInput>,
}

/// Update product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    /// When present, replaces the full size list
    pub sizes: Option<Vec<ProductSizeInput>>,
    /// When present, replaces the full complement list
    pub complements: Option<Vec<ProductComplementInput>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSizeInput {
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductComplementInput {
    pub name: String,
    pub price: f64,
}
