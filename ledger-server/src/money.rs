//! Money utilities using rust_decimal for precision
//!
//! All monetary calculations are done using `Decimal` internally, then
//! converted to `f64` for storage/serialization. Currency values always
//! carry 2 decimal places, rounded half-away-from-zero — the same result
//! the legacy storefront got from `Math.round(x * 100) / 100` on the
//! amounts it actually handles, without the floating-point drift.

use rust_decimal::prelude::*;

/// Rounding precision for monetary values (2 decimal places)
pub const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed price per item (R$1,000,000)
pub const MAX_PRICE: f64 = 1_000_000.0;

/// Maximum allowed quantity per cart item
pub const MAX_QUANTITY: i32 = 9999;

/// Convert f64 to Decimal for calculation.
///
/// Non-finite or out-of-range values collapse to zero; validation rejects
/// them before they reach arithmetic.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places.
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Round an f64 amount to 2 decimal places through Decimal.
#[inline]
pub fn round_money(value: f64) -> f64 {
    to_f64(to_decimal(value))
}

/// Compare two monetary values for equality (within 0.01 tolerance).
pub fn money_eq(a: f64, b: f64) -> bool {
    let diff = (to_decimal(a) - to_decimal(b)).abs();
    diff < MONEY_TOLERANCE
}

/// Check if a tendered amount covers a required total
/// (with small tolerance for edge cases).
pub fn covers(tendered: f64, required: f64) -> bool {
    to_decimal(tendered) >= to_decimal(required) - MONEY_TOLERANCE
}

/// Format an amount as Brazilian currency: `R$ 1.234,56`.
///
/// Presentation helper shared by receipts and reports so every surface
/// shows the same rounded value the ledger stored.
pub fn format_price(amount: f64) -> String {
    let rounded = to_decimal(amount)
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    let cents = (rounded * Decimal::ONE_HUNDRED)
        .to_i64()
        .unwrap_or_default();
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    let whole = cents / 100;
    let frac = cents % 100;

    // Group the integer part with '.' every three digits
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    format!("{sign}R$ {grouped},{frac:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_decimal_precision() {
        // Classic floating point problem: 0.1 + 0.2 != 0.3
        let sum_f64 = 0.1_f64 + 0.2_f64;
        assert_ne!(sum_f64, 0.3);

        let sum_dec = to_decimal(0.1) + to_decimal(0.2);
        assert_eq!(to_f64(sum_dec), 0.3);
    }

    #[test]
    fn test_accumulation_precision() {
        // Sum R$0.01 one thousand times
        let mut total = Decimal::ZERO;
        for _ in 0..1000 {
            total += to_decimal(0.01);
        }
        assert_eq!(to_f64(total), 10.0);
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        assert_eq!(round_money(0.005), 0.01);
        assert_eq!(round_money(0.004), 0.0);
        assert_eq!(round_money(-0.005), -0.01);
    }

    #[test]
    fn test_to_decimal_non_finite_becomes_zero() {
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
        assert_eq!(to_decimal(f64::INFINITY), Decimal::ZERO);
        assert_eq!(to_decimal(f64::NEG_INFINITY), Decimal::ZERO);
        assert_eq!(to_decimal(f64::MAX), Decimal::ZERO);
    }

    #[test]
    fn test_money_eq() {
        assert!(money_eq(100.0, 100.0));
        assert!(money_eq(100.004, 100.006));
        assert!(!money_eq(100.0, 100.02));
    }

    #[test]
    fn test_covers() {
        assert!(covers(100.0, 100.0));
        assert!(covers(100.01, 100.0));
        assert!(covers(99.995, 100.0)); // within tolerance
        assert!(!covers(99.98, 100.0));
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(17.9), "R$ 17,90");
        assert_eq!(format_price(0.0), "R$ 0,00");
        assert_eq!(format_price(1234.56), "R$ 1.234,56");
        assert_eq!(format_price(1_000_000.0), "R$ 1.000.000,00");
        assert_eq!(format_price(-5.5), "-R$ 5,50");
    }

    #[test]
    fn test_format_price_rounds_before_formatting() {
        assert_eq!(format_price(17.899), "R$ 17,90");
        assert_eq!(format_price(17.894), "R$ 17,89");
    }
}
