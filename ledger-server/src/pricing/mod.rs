//! Cart Pricing Engine
//!
//! Computes unit prices, line totals, and cart subtotals for checkout
//! carts and table sales. Pure: no I/O, no state between calls.
//!
//! Price resolution: a selected size *replaces* the product base price
//! entirely; complements are always additive on top of whichever base
//! applies.

use rust_decimal::prelude::*;
use shared::models::{CartItem, CartItemInput, TableSaleItem, TableSaleItemInput};

use crate::money::{DECIMAL_PLACES, MAX_PRICE, MAX_QUANTITY, to_decimal, to_f64};

/// Pricing validation failures
#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),
}

pub type PricingResult<T> = Result<T, PricingError>;

/// Validate that a price field is finite, non-negative, and within bounds.
fn require_valid_price(value: f64, field: &str) -> PricingResult<()> {
    if !value.is_finite() {
        return Err(PricingError::InvalidPrice(format!(
            "{field} must be a finite number, got {value}"
        )));
    }
    if value < 0.0 {
        return Err(PricingError::InvalidPrice(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    if value > MAX_PRICE {
        return Err(PricingError::InvalidPrice(format!(
            "{field} exceeds maximum allowed ({MAX_PRICE}), got {value}"
        )));
    }
    Ok(())
}

/// Validate a cart item before pricing.
///
/// A quantity reduced to zero means the item should have been removed from
/// the cart by the caller, not priced as a zero line — it is rejected here.
pub fn validate_cart_item(item: &CartItemInput) -> PricingResult<()> {
    require_valid_price(item.price, "price")?;

    if let Some(size) = &item.selected_size {
        require_valid_price(size.price, "size price")?;
    }
    for complement in &item.complements {
        require_valid_price(complement.price, "complement price")?;
    }

    if item.quantity < 1 {
        return Err(PricingError::InvalidQuantity(format!(
            "quantity must be at least 1, got {}",
            item.quantity
        )));
    }
    if item.quantity > MAX_QUANTITY {
        return Err(PricingError::InvalidQuantity(format!(
            "quantity exceeds maximum allowed ({MAX_QUANTITY}), got {}",
            item.quantity
        )));
    }

    Ok(())
}

/// Per-unit price: (size price, or else base price) + sum of complements.
fn unit_price_decimal(item: &CartItemInput) -> Decimal {
    let base = match &item.selected_size {
        Some(size) => to_decimal(size.price),
        None => to_decimal(item.price),
    };
    let complements: Decimal = item.complements.iter().map(|c| to_decimal(c.price)).sum();
    (base + complements)
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Price a single cart item into its persisted snapshot form.
pub fn price_item(item: &CartItemInput) -> PricingResult<CartItem> {
    validate_cart_item(item)?;

    let unit_price = unit_price_decimal(item);
    let line_total = (unit_price * Decimal::from(item.quantity))
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);

    Ok(CartItem {
        product_id: item.product_id,
        name: item.name.clone(),
        price: item.price,
        selected_size: item.selected_size.clone(),
        complements: item.complements.clone(),
        quantity: item.quantity,
        observations: item.observations.clone(),
        unit_price: to_f64(unit_price),
        line_total: to_f64(line_total),
    })
}

/// Price a whole cart: snapshots plus the subtotal (sum of line totals).
pub fn price_cart(items: &[CartItemInput]) -> PricingResult<(Vec<CartItem>, f64)> {
    let mut priced = Vec::with_capacity(items.len());
    let mut subtotal = Decimal::ZERO;

    for item in items {
        let snapshot = price_item(item)?;
        subtotal += to_decimal(snapshot.line_total);
        priced.push(snapshot);
    }

    Ok((priced, to_f64(subtotal)))
}

/// Price table sale items (quantity may be a weight) and the subtotal.
pub fn price_table_items(
    items: &[TableSaleItemInput],
) -> PricingResult<(Vec<TableSaleItem>, f64)> {
    let mut priced = Vec::with_capacity(items.len());
    let mut subtotal = Decimal::ZERO;

    for item in items {
        require_valid_price(item.unit_price, "unit_price")?;
        if !item.quantity.is_finite() || item.quantity <= 0.0 {
            return Err(PricingError::InvalidQuantity(format!(
                "quantity must be positive, got {}",
                item.quantity
            )));
        }

        let line = (to_decimal(item.unit_price) * to_decimal(item.quantity))
            .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
        subtotal += line;

        priced.push(TableSaleItem {
            product_code: item.product_code.clone(),
            name: item.name.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            subtotal: to_f64(line),
        });
    }

    Ok((priced, to_f64(subtotal)))
}

/// Order subtotal at the delivery stage: cart subtotal plus delivery fee.
pub fn order_subtotal(cart_subtotal: f64, delivery_fee: f64) -> f64 {
    to_f64(to_decimal(cart_subtotal) + to_decimal(delivery_fee))
}
