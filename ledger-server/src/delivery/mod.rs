//! Delivery Fee Resolver
//!
//! Maps a neighborhood record (or its absence) to a delivery fee and an
//! estimated delivery time. Whether an unknown neighborhood blocks checkout
//! or falls back to a zero fee is a configuration policy decided by the
//! caller; this module only reports whether the lookup matched.

use serde::Serialize;
use shared::models::Neighborhood;

/// Fee applied when the neighborhood is not in the reference set
pub const FALLBACK_FEE: f64 = 0.0;

/// Resolved delivery quote
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeeQuote {
    pub fee: f64,
    pub eta_minutes: i32,
    /// False when the neighborhood was absent and the fallback applied
    pub matched: bool,
}

/// Resolve the delivery fee and ETA for a neighborhood lookup result.
///
/// `default_eta_minutes` is the configured estimate quoted when the
/// neighborhood is unknown (the legacy storefront used 50 minutes).
pub fn resolve(neighborhood: Option<&Neighborhood>, default_eta_minutes: i32) -> FeeQuote {
    match neighborhood {
        Some(n) => FeeQuote {
            fee: n.delivery_fee,
            eta_minutes: n.delivery_time_minutes,
            matched: true,
        },
        None => FeeQuote {
            fee: FALLBACK_FEE,
            eta_minutes: default_eta_minutes,
            matched: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_neighborhood(fee: f64, minutes: i32) -> Neighborhood {
        Neighborhood {
            id: 1,
            name: "Centro".to_string(),
            delivery_fee: fee,
            delivery_time_minutes: minutes,
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_known_neighborhood_uses_configured_fee() {
        let n = make_neighborhood(5.0, 35);
        let quote = resolve(Some(&n), 50);
        assert_eq!(quote.fee, 5.0);
        assert_eq!(quote.eta_minutes, 35);
        assert!(quote.matched);
    }

    #[test]
    fn test_unknown_neighborhood_falls_back() {
        let quote = resolve(None, 50);
        assert_eq!(quote.fee, 0.0);
        assert_eq!(quote.eta_minutes, 50);
        assert!(!quote.matched);
    }
}
