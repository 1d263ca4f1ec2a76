//! # Price Rules
//!
//! The purchase-price ceiling and the fixed price buckets used by the
//! analytics projections.
//!
//! ## Why Decimal?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: rust_decimal::Decimal                                    │
//! │    Prices round-trip through the DECIMAL(8, 2) column exactly.         │
//! │    Floats appear only at the very edge, as chart inputs.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Price Ceiling
// =============================================================================

/// The maximum storable purchase price: 999999.99.
///
/// This mirrors the DECIMAL(8, 2) column; anything above it would be
/// rejected by the store, so writes clamp instead.
pub fn price_ceiling() -> Decimal {
    Decimal::new(99_999_999, 2)
}

/// Clamps a purchase price to the ceiling.
///
/// Applied by the gateway on every insert/update regardless of what the
/// entry form already validated. Negative prices pass through unchanged;
/// they are excluded by convention at the form layer, not enforced here.
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use vinoteca_core::price::{clamp_price, price_ceiling};
///
/// let too_high = Decimal::new(123_456_789_00, 2);
/// assert_eq!(clamp_price(too_high), price_ceiling());
///
/// let fine = Decimal::new(1_500_00, 2);
/// assert_eq!(clamp_price(fine), fine);
/// ```
pub fn clamp_price(price: Decimal) -> Decimal {
    price.min(price_ceiling())
}

// =============================================================================
// Price Buckets
// =============================================================================

/// The four fixed price ranges used for aggregate reporting.
///
/// Thresholds are in collection currency units: below 1 000, 1 000 - 5 000,
/// 5 000 - 10 000, above 10 000 (range bounds inclusive on the upper end).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceBucket {
    Under1000,
    From1000To5000,
    From5000To10000,
    Over10000,
}

impl PriceBucket {
    /// All buckets in ascending price order.
    pub const ALL: [PriceBucket; 4] = [
        PriceBucket::Under1000,
        PriceBucket::From1000To5000,
        PriceBucket::From5000To10000,
        PriceBucket::Over10000,
    ];

    /// Classifies a price into its bucket.
    pub fn for_price(price: Decimal) -> Self {
        if price < Decimal::new(1000, 0) {
            PriceBucket::Under1000
        } else if price <= Decimal::new(5000, 0) {
            PriceBucket::From1000To5000
        } else if price <= Decimal::new(10_000, 0) {
            PriceBucket::From5000To10000
        } else {
            PriceBucket::Over10000
        }
    }

    /// Stable index used by the SQL CASE projection (0..=3, ascending).
    pub const fn index(self) -> i32 {
        match self {
            PriceBucket::Under1000 => 0,
            PriceBucket::From1000To5000 => 1,
            PriceBucket::From5000To10000 => 2,
            PriceBucket::Over10000 => 3,
        }
    }

    /// Inverse of [`PriceBucket::index`]; `None` for anything out of range.
    pub const fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(PriceBucket::Under1000),
            1 => Some(PriceBucket::From1000To5000),
            2 => Some(PriceBucket::From5000To10000),
            3 => Some(PriceBucket::Over10000),
            _ => None,
        }
    }

    /// Human-readable range label used in tables and chart categories.
    pub const fn label(self) -> &'static str {
        match self {
            PriceBucket::Under1000 => "under 1000",
            PriceBucket::From1000To5000 => "1000-5000",
            PriceBucket::From5000To10000 => "5000-10000",
            PriceBucket::Over10000 => "over 10000",
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceiling_is_the_decimal_column_maximum() {
        assert_eq!(price_ceiling().to_string(), "999999.99");
    }

    #[test]
    fn clamp_caps_only_above_the_ceiling() {
        let above = Decimal::new(1_000_000_00, 2); // 1 000 000.00
        assert_eq!(clamp_price(above), price_ceiling());

        let exact = price_ceiling();
        assert_eq!(clamp_price(exact), exact);

        let below = Decimal::new(999_999_98, 2);
        assert_eq!(clamp_price(below), below);

        // Negative values are a convention violation but pass through.
        let negative = Decimal::new(-500, 2);
        assert_eq!(clamp_price(negative), negative);
    }

    #[test]
    fn bucket_thresholds() {
        let cases = [
            ("0.00", PriceBucket::Under1000),
            ("999.99", PriceBucket::Under1000),
            ("1000.00", PriceBucket::From1000To5000),
            ("5000.00", PriceBucket::From1000To5000),
            ("5000.01", PriceBucket::From5000To10000),
            ("10000.00", PriceBucket::From5000To10000),
            ("10000.01", PriceBucket::Over10000),
        ];
        for (raw, expected) in cases {
            let price: Decimal = raw.parse().expect("decimal literal");
            assert_eq!(PriceBucket::for_price(price), expected, "price {raw}");
        }
    }

    #[test]
    fn index_round_trips() {
        for bucket in PriceBucket::ALL {
            assert_eq!(PriceBucket::from_index(bucket.index()), Some(bucket));
        }
        assert_eq!(PriceBucket::from_index(4), None);
        assert_eq!(PriceBucket::from_index(-1), None);
    }
}
