//! Cashback Accrual & Redemption Engine
//!
//! Pure computations over the customer balance and order totals. The
//! storage side (conditional balance debit, transaction rows) lives in the
//! checkout service; everything here must hold regardless of which caller
//! (delivery, PDV) feeds it.
//!
//! Accrual is computed on the payable total *after* redemption and
//! including the delivery fee — the amount the customer actually paid, not
//! the pre-discount subtotal.

use rust_decimal::prelude::*;

use crate::money::{DECIMAL_PLACES, to_decimal, to_f64};

/// Default accrual rate: 5% of the paid total
pub const DEFAULT_ACCRUAL_PERCENT: f64 = 5.0;

/// Redemption validation failures
#[derive(Debug, thiserror::Error)]
pub enum CashbackError {
    #[error("redemption amount must be positive, got {0}")]
    InvalidAmount(f64),

    #[error("insufficient cashback balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: f64, available: f64 },

    #[error("redemption exceeds order total: requested {requested}, payable {payable}")]
    ExceedsOrderTotal { requested: f64, payable: f64 },
}

pub type CashbackResult<T> = Result<T, CashbackError>;

/// Validate a redemption request against the available balance and the
/// order's payable base (cart subtotal + delivery fee).
///
/// Must hold: `0 < requested <= min(available, payable_base)`.
pub fn validate_redemption(
    requested: f64,
    available: f64,
    payable_base: f64,
) -> CashbackResult<()> {
    if !requested.is_finite() || requested <= 0.0 {
        return Err(CashbackError::InvalidAmount(requested));
    }
    let requested_dec = to_decimal(requested);
    if requested_dec > to_decimal(available) {
        return Err(CashbackError::InsufficientBalance {
            requested,
            available,
        });
    }
    if requested_dec > to_decimal(payable_base) {
        return Err(CashbackError::ExceedsOrderTotal {
            requested,
            payable: payable_base,
        });
    }
    Ok(())
}

/// Payable total: subtotal + delivery fee - applied cashback, clamped at 0.
///
/// The clamp is defensive — `validate_redemption` already rejects requests
/// above the payable base, so a correct flow never triggers it.
pub fn payable_total(subtotal: f64, delivery_fee: f64, applied_cashback: f64) -> f64 {
    let total = to_decimal(subtotal) + to_decimal(delivery_fee) - to_decimal(applied_cashback);
    to_f64(total.max(Decimal::ZERO))
}

/// Cashback earned on a paid order: payable total x accrual rate,
/// rounded to 2 decimal places.
pub fn accrual_amount(payable: f64, accrual_percent: f64) -> f64 {
    let earned = to_decimal(payable) * to_decimal(accrual_percent) / Decimal::ONE_HUNDRED;
    to_f64(earned.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accrual_on_post_redemption_payable() {
        // subtotal 100.00, fee 5.00, applied 10.00 -> payable 95.00
        // 5% accrual -> 4.75, not 5.25
        let payable = payable_total(100.0, 5.0, 10.0);
        assert_eq!(payable, 95.0);
        assert_eq!(accrual_amount(payable, 5.0), 4.75);
    }

    #[test]
    fn test_accrual_rounds_to_cents() {
        // 33.33 * 5% = 1.6665 -> 1.67
        assert_eq!(accrual_amount(33.33, 5.0), 1.67);
    }

    #[test]
    fn test_redemption_exceeding_balance_rejected() {
        let err = validate_redemption(20.0, 15.0, 100.0).unwrap_err();
        assert!(matches!(err, CashbackError::InsufficientBalance { .. }));
    }

    #[test]
    fn test_redemption_exceeding_order_total_rejected() {
        let err = validate_redemption(20.0, 50.0, 15.0).unwrap_err();
        assert!(matches!(err, CashbackError::ExceedsOrderTotal { .. }));
    }

    #[test]
    fn test_redemption_exactly_at_balance_accepted() {
        assert!(validate_redemption(15.0, 15.0, 100.0).is_ok());
    }

    #[test]
    fn test_redemption_exactly_at_order_total_accepted() {
        assert!(validate_redemption(15.0, 50.0, 15.0).is_ok());
    }

    #[test]
    fn test_zero_and_negative_redemption_rejected() {
        assert!(matches!(
            validate_redemption(0.0, 50.0, 100.0),
            Err(CashbackError::InvalidAmount(_))
        ));
        assert!(matches!(
            validate_redemption(-5.0, 50.0, 100.0),
            Err(CashbackError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_payable_total_never_negative() {
        // Forced violation: applied above subtotal+fee. The validator would
        // have rejected this; the clamp must still hold.
        assert_eq!(payable_total(10.0, 0.0, 25.0), 0.0);
    }

    #[test]
    fn test_payable_total_without_redemption() {
        assert_eq!(payable_total(40.30, 5.0, 0.0), 45.30);
    }
}
