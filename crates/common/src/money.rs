//! Money helpers.
//!
//! All amounts are [`Decimal`] values in major currency units (dollars).
//! Arithmetic runs at full precision; rounding to currency precision happens
//! only at settlement and display boundaries.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Round an amount to currency precision (2 decimal places).
#[must_use]
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert a major-unit amount to integer minor units (cents), as payment
/// gateways expect. The amount must already be rounded to cents.
#[must_use]
pub fn to_minor_units(amount: Decimal) -> i64 {
    (round_to_cents(amount) * Decimal::ONE_HUNDRED)
        .trunc()
        .to_i64()
        .unwrap_or(0)
}

/// The platform-fee split of a gross payment amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSplit {
    /// Platform fee, rounded to cents.
    pub platform_fee: Decimal,
    /// Amount payable to the clipper. Always `gross - platform_fee`, so the
    /// two parts sum exactly to the gross amount.
    pub clipper_net: Decimal,
}

/// Split a gross payment into platform fee and clipper net.
///
/// The fee is rounded to cents and the net is the exact remainder, so
/// `platform_fee + clipper_net == gross` holds to currency precision.
#[must_use]
pub fn split_fee(gross: Decimal, fee_rate: Decimal) -> FeeSplit {
    let gross = round_to_cents(gross);
    let platform_fee = round_to_cents(gross * fee_rate);
    FeeSplit {
        platform_fee,
        clipper_net: gross - platform_fee,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_round_to_cents() {
        assert_eq!(round_to_cents(d("10.004")), d("10.00"));
        assert_eq!(round_to_cents(d("10.005")), d("10.01"));
        assert_eq!(round_to_cents(d("10")), d("10"));
    }

    #[test]
    fn test_to_minor_units() {
        assert_eq!(to_minor_units(d("10.00")), 1000);
        assert_eq!(to_minor_units(d("0.01")), 1);
        assert_eq!(to_minor_units(d("0")), 0);
    }

    #[test]
    fn test_split_fee_sums_exactly() {
        let split = split_fee(d("10.00"), d("0.05"));
        assert_eq!(split.platform_fee, d("0.50"));
        assert_eq!(split.clipper_net, d("9.50"));
        assert_eq!(split.platform_fee + split.clipper_net, d("10.00"));
    }

    #[test]
    fn test_split_fee_awkward_amounts() {
        // 5% of 10.01 is 0.5005; fee rounds to 0.50, net takes the remainder
        let split = split_fee(d("10.01"), d("0.05"));
        assert_eq!(split.platform_fee + split.clipper_net, d("10.01"));

        let split = split_fee(d("0.01"), d("0.05"));
        assert_eq!(split.platform_fee + split.clipper_net, d("0.01"));
    }

    #[test]
    fn test_split_fee_zero() {
        let split = split_fee(Decimal::ZERO, d("0.05"));
        assert_eq!(split.platform_fee, Decimal::ZERO);
        assert_eq!(split.clipper_net, Decimal::ZERO);
    }
}
