//! Payment rate calculator.
//!
//! Converts a view count and a creator rate ("pay `rate_amount` per
//! `rate_views` views") into a gross payment amount. Arithmetic runs at
//! full [`Decimal`] precision; rounding to currency precision happens only
//! at settlement and display boundaries.

use clipcommerce_common::{AppError, AppResult};
use rust_decimal::Decimal;

/// Compute the gross payment for a view count under a creator's rate.
///
/// `payment = (view_count / rate_views) * rate_amount`
///
/// Returns a validation error when `rate_views` is not strictly positive
/// (which would divide by zero) or `rate_amount` is not strictly positive.
pub fn compute_payment(
    view_count: u64,
    rate_amount: Decimal,
    rate_views: i32,
) -> AppResult<Decimal> {
    if rate_views <= 0 {
        return Err(AppError::Validation(
            "rate_views must be a positive view count".to_string(),
        ));
    }
    if rate_amount <= Decimal::ZERO {
        return Err(AppError::Validation(
            "rate_amount must be a positive amount".to_string(),
        ));
    }

    Ok(Decimal::from(view_count) / Decimal::from(rate_views) * rate_amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_twenty_dollars_per_thousand_views() {
        // $20 per 1000 views, 500 views at submit
        let payment = compute_payment(500, d("20"), 1000).unwrap();
        assert_eq!(payment, d("10"));
    }

    #[test]
    fn test_zero_views_pays_zero() {
        assert_eq!(compute_payment(0, d("20"), 1000).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_linear_in_view_count() {
        let base = compute_payment(250, d("20"), 1000).unwrap();
        let doubled = compute_payment(500, d("20"), 1000).unwrap();
        let tripled = compute_payment(750, d("20"), 1000).unwrap();
        assert_eq!(doubled, base * d("2"));
        assert_eq!(tripled, base * d("3"));
    }

    #[test]
    fn test_linear_in_rate_amount() {
        let base = compute_payment(500, d("10"), 1000).unwrap();
        let doubled = compute_payment(500, d("20"), 1000).unwrap();
        assert_eq!(doubled, base * d("2"));
    }

    #[test]
    fn test_no_premature_rounding() {
        // 1 view at $20/1000 is $0.02 exactly; 1 view at $1/3 keeps precision
        assert_eq!(compute_payment(1, d("20"), 1000).unwrap(), d("0.02"));
        let fractional = compute_payment(1, d("1"), 3).unwrap();
        assert!(fractional > d("0.333"));
        assert!(fractional < d("0.334"));
    }

    #[test]
    fn test_zero_rate_views_is_rejected() {
        let err = compute_payment(500, d("20"), 0).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_negative_rate_amount_is_rejected() {
        let err = compute_payment(500, d("-1"), 1000).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}
