//! Order Model (delivery and PDV sales)

use serde::{Deserialize, Serialize};

/// Payment method accepted at checkout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum PaymentMethod {
    Money,
    Pix,
    Card,
    CreditCard,
    DebitCard,
}

impl PaymentMethod {
    /// Only physical cash affects the register drawer balance.
    pub fn is_cash(&self) -> bool {
        matches!(self, PaymentMethod::Money)
    }
}

/// Sales origin of an order row
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderChannel {
    Delivery,
    Pdv,
}

/// Order lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    OutForDelivery,
    ReadyForPickup,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Terminal states accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether `self -> next` is a legal lifecycle step.
    ///
    /// Cancellation is allowed from any non-terminal state.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        if self.is_terminal() {
            return false;
        }
        if next == Cancelled {
            return true;
        }
        matches!(
            (*self, next),
            (Pending, Confirmed)
                | (Confirmed, Preparing)
                | (Preparing, OutForDelivery)
                | (Preparing, ReadyForPickup)
                | (OutForDelivery, Delivered)
                | (ReadyForPickup, Delivered)
        )
    }
}

/// Size chosen for a cart item; its price replaces the product base price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedSize {
    pub name: String,
    pub price: f64,
}

/// Complement chosen for a cart item; additive on top of the base price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedComplement {
    pub name: String,
    pub price: f64,
}

/// Cart item as submitted by a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemInput {
    pub product_id: i64,
    pub name: String,
    /// Product base price
    pub price: f64,
    pub selected_size: Option<SelectedSize>,
    #[serde(default)]
    pub complements: Vec<SelectedComplement>,
    pub quantity: i32,
    pub observations: Option<String>,
}

/// Priced cart item snapshot persisted with the order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: i64,
    pub name: String,
    pub price: f64,
    pub selected_size: Option<SelectedSize>,
    #[serde(default)]
    pub complements: Vec<SelectedComplement>,
    pub quantity: i32,
    pub observations: Option<String>,
    /// (size price or base price) + complements, rounded to 2 dp
    pub unit_price: f64,
    /// unit_price * quantity, rounded to 2 dp
    pub line_total: f64,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub channel: OrderChannel,
    pub customer_id: Option<i64>,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub address: Option<String>,
    pub neighborhood: Option<String>,
    pub items: Vec<CartItem>,
    /// Sum of item line totals
    pub subtotal: f64,
    pub delivery_fee: f64,
    /// Redeemed balance applied to this order
    pub cashback_applied: f64,
    /// Balance earned from this order's payable total
    pub cashback_earned: f64,
    /// subtotal + delivery_fee - cashback_applied, clamped at >= 0
    pub total_amount: f64,
    pub payment_method: PaymentMethod,
    /// Money payments only; must cover the total
    pub change_for: Option<f64>,
    pub status: OrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Delivery checkout payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub customer_name: String,
    pub customer_phone: String,
    pub address: String,
    pub neighborhood: String,
    pub items: Vec<CartItemInput>,
    pub payment_method: PaymentMethod,
    pub change_for: Option<f64>,
    /// Balance the customer asked to redeem on this order
    pub cashback_to_apply: Option<f64>,
}

/// PDV (in-person) sale payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdvSaleRequest {
    pub items: Vec<CartItemInput>,
    pub payment_method: PaymentMethod,
    pub change_for: Option<f64>,
    /// Optional customer attribution (enables cashback accrual/redemption)
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub cashback_to_apply: Option<f64>,
}

/// Status transition payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}
