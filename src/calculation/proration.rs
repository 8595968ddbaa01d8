//! Rounding and day-based proration.
//!
//! Every monetary figure the engine produces is rounded to whole pesos
//! as soon as it is computed; no fractional currency is carried from one
//! step to the next.

use rust_decimal::{Decimal, RoundingStrategy};

/// Days in a payroll month.
pub const DAYS_PER_MONTH: u32 = 30;

/// Rounds a monetary value to the nearest whole peso, halves away from zero.
///
/// ```
/// use nomina_engine::calculation::round_currency;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_currency(Decimal::from_str("59312.5").unwrap()), Decimal::from(59313));
/// assert_eq!(round_currency(Decimal::from_str("7430.49").unwrap()), Decimal::from(7430));
/// ```
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Applies a rate to a base and rounds the result to whole pesos.
pub fn apply_rate(base: Decimal, rate: Decimal) -> Decimal {
    round_currency(base * rate)
}

/// The unrounded daily value of a monthly amount.
pub fn daily_rate(monthly: Decimal) -> Decimal {
    monthly / Decimal::from(DAYS_PER_MONTH)
}

/// Prorates a monthly amount by days worked out of 30.
///
/// Thirty or more days pays the full monthly amount.
///
/// ```
/// use nomina_engine::calculation::prorate;
/// use rust_decimal::Decimal;
///
/// assert_eq!(prorate(Decimal::from(1_423_500), 30), Decimal::from(1_423_500));
/// assert_eq!(prorate(Decimal::from(1_423_500), 31), Decimal::from(1_423_500));
/// assert_eq!(prorate(Decimal::from(1_423_500), 15), Decimal::from(711_750));
/// assert_eq!(prorate(Decimal::from(200_000), 0), Decimal::ZERO);
/// ```
pub fn prorate(monthly: Decimal, days: u32) -> Decimal {
    if days >= DAYS_PER_MONTH {
        return round_currency(monthly);
    }
    round_currency(monthly * Decimal::from(days) / Decimal::from(DAYS_PER_MONTH))
}

/// Clamps negative amounts to zero.
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round_currency_midpoint_goes_up() {
        assert_eq!(round_currency(dec("0.5")), dec("1"));
        assert_eq!(round_currency(dec("120997.5")), dec("120998"));
        assert_eq!(round_currency(dec("1185.78")), dec("1186"));
    }

    #[test]
    fn test_prorate_rounds_fractional_days() {
        // 1,300,000 × 7 / 30 = 303,333.33
        assert_eq!(prorate(dec("1300000"), 7), dec("303333"));
        // 1,300,000 × 8 / 30 = 346,666.67
        assert_eq!(prorate(dec("1300000"), 8), dec("346667"));
    }

    #[test]
    fn test_apply_rate() {
        assert_eq!(apply_rate(dec("1423500"), dec("0.04")), dec("56940"));
        assert_eq!(apply_rate(dec("1423500"), dec("0.00522")), dec("7431"));
    }

    #[test]
    fn test_daily_rate_is_unrounded() {
        assert_eq!(daily_rate(dec("1500000")), dec("50000"));
        assert!(daily_rate(dec("1300000")) > dec("43333.33"));
        assert!(daily_rate(dec("1300000")) < dec("43333.34"));
    }

    #[test]
    fn test_non_negative() {
        assert_eq!(non_negative(dec("-10")), Decimal::ZERO);
        assert_eq!(non_negative(dec("10")), dec("10"));
    }
}
