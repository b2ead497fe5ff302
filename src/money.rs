//! Money helpers. Amounts are stored as integer cents and shown as two-place decimals.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::error::{AppError, AppResult};

pub fn to_decimal(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

fn out_of_range() -> AppError {
    AppError::ValidationFailed("amount is out of range".into())
}

/// Converts a user-supplied amount to cents, rejecting more than two decimal places.
pub fn to_cents(amount: Decimal) -> AppResult<i64> {
    if amount.normalize().scale() > 2 {
        return Err(AppError::ValidationFailed(
            "amounts support at most two decimal places".into(),
        ));
    }
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(out_of_range)?
        .trunc()
        .to_i64()
        .ok_or_else(out_of_range)
}

/// Gross value of `quantity` units at `unit_price` cents.
pub fn line_total(unit_price: i64, quantity: i32) -> AppResult<i64> {
    unit_price
        .checked_mul(i64::from(quantity))
        .ok_or_else(out_of_range)
}

/// Adds two cent amounts, failing instead of wrapping.
pub fn add_cents(left: i64, right: i64) -> AppResult<i64> {
    left.checked_add(right).ok_or_else(out_of_range)
}

/// `amount - amount * percent / 100`, computed exactly and rounded once to the
/// cent, half away from zero.
pub fn apply_percentage_off(amount: i64, percent: i32) -> i64 {
    let amount_dec = Decimal::from(amount);
    let exact = amount_dec - amount_dec * Decimal::from(percent) / Decimal::ONE_HUNDRED;
    exact
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(amount)
}

/// Formats cents as `12.34` for human-readable notifications.
pub fn format_amount(cents: i64) -> String {
    format!("{:.2}", to_decimal(cents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn discounted_total_rounds_half_away_from_zero() {
        assert_eq!(apply_percentage_off(4000, 10), 3600);
        // 2097 - 1048.5 = 1048.5 cents
        assert_eq!(apply_percentage_off(2097, 50), 1049);
        // 333 - 49.95 = 283.05 cents
        assert_eq!(apply_percentage_off(333, 15), 283);
        assert_eq!(apply_percentage_off(1999, 0), 1999);
        assert_eq!(apply_percentage_off(1999, 100), 0);
    }

    #[test]
    fn to_cents_rejects_sub_cent_precision() {
        assert_eq!(to_cents(dec!(12.5)).unwrap(), 1250);
        assert_eq!(to_cents(dec!(-3.00)).unwrap(), -300);
        assert!(to_cents(dec!(0.001)).is_err());
    }

    #[test]
    fn oversized_amounts_are_rejected_not_panicking() {
        let huge = Decimal::MAX;
        assert!(matches!(to_cents(huge), Err(AppError::ValidationFailed(_))));
        assert!(matches!(
            to_cents(dec!(1000000000000000000000000000)),
            Err(AppError::ValidationFailed(_))
        ));
        assert!(to_cents(dec!(92233720368547758.08)).is_err());
        assert!(line_total(i64::MAX, 2).is_err());
        assert_eq!(line_total(199, 3).unwrap(), 597);
        assert!(add_cents(i64::MAX, 1).is_err());
    }

    #[test]
    fn formats_two_places() {
        assert_eq!(format_amount(3600), "36.00");
        assert_eq!(format_amount(5), "0.05");
        assert_eq!(to_decimal(1400), dec!(14.00));
    }
}
