//! Paid absences: incapacity, leave and vacation days.
//!
//! All three are priced from the daily rate (monthly salary / 30).
//! Incapacity pays the first two days at 100% and every following day at
//! two thirds of the daily rate; leave and vacation are paid in full.

use rust_decimal::Decimal;

use crate::models::AuditStep;

use super::proration::{daily_rate, round_currency};

/// Incapacity days paid at the full daily rate.
pub const INCAPACITY_FULL_PAY_DAYS: u32 = 2;

/// The result of pricing paid absences.
#[derive(Debug, Clone)]
pub struct AbsencePayResult {
    /// Incapacity (sick leave) pay.
    pub incapacity: Decimal,
    /// Paid leave.
    pub leave: Decimal,
    /// Vacation days paid in the period.
    pub vacation: Decimal,
    /// Audit step for incapacity.
    pub incapacity_step: AuditStep,
    /// Audit step for leave and vacation.
    pub leave_step: AuditStep,
}

/// Prices incapacity days.
///
/// ```
/// use nomina_engine::calculation::calculate_incapacity_pay;
/// use rust_decimal::Decimal;
///
/// // daily 100,000: 2 × 100,000 + 3 × 66,666.67 = 400,000
/// let pay = calculate_incapacity_pay(Decimal::from(3_000_000), 5);
/// assert_eq!(pay, Decimal::from(400_000));
/// ```
pub fn calculate_incapacity_pay(base_salary: Decimal, days: u32) -> Decimal {
    let daily = daily_rate(base_salary);
    let full_days = days.min(INCAPACITY_FULL_PAY_DAYS);
    let reduced_days = days - full_days;

    let full = round_currency(daily * Decimal::from(full_days));
    let reduced = round_currency(
        daily * Decimal::from(2) / Decimal::from(3) * Decimal::from(reduced_days),
    );
    full + reduced
}

/// Prices incapacity, leave and vacation days for one period.
pub fn calculate_absence_pay(
    base_salary: Decimal,
    incapacity_days: u32,
    leave_days: u32,
    vacation_days: u32,
    step_number: u32,
) -> AbsencePayResult {
    let daily = daily_rate(base_salary);
    let incapacity = calculate_incapacity_pay(base_salary, incapacity_days);
    let leave = round_currency(daily * Decimal::from(leave_days));
    let vacation = round_currency(daily * Decimal::from(vacation_days));

    let incapacity_reasoning = if incapacity_days == 0 {
        "No incapacity days reported".to_string()
    } else {
        let full_days = incapacity_days.min(INCAPACITY_FULL_PAY_DAYS);
        format!(
            "{} day(s) at 100% + {} day(s) at 2/3 of daily rate ${} = ${}",
            full_days,
            incapacity_days - full_days,
            round_currency(daily),
            incapacity
        )
    };

    AbsencePayResult {
        incapacity,
        leave,
        vacation,
        incapacity_step: AuditStep {
            step_number,
            rule_id: "incapacity".to_string(),
            rule_name: "Incapacity Pay".to_string(),
            legal_ref: "CST art. 227; Decreto 1049 de 1999".to_string(),
            input: serde_json::json!({
                "base_salary": base_salary.to_string(),
                "incapacity_days": incapacity_days
            }),
            output: serde_json::json!({ "incapacity": incapacity.to_string() }),
            reasoning: incapacity_reasoning,
        },
        leave_step: AuditStep {
            step_number: step_number + 1,
            rule_id: "leave_and_vacation".to_string(),
            rule_name: "Leave and Vacation Pay".to_string(),
            legal_ref: "CST art. 57, 186".to_string(),
            input: serde_json::json!({
                "base_salary": base_salary.to_string(),
                "leave_days": leave_days,
                "vacation_days": vacation_days
            }),
            output: serde_json::json!({
                "leave": leave.to_string(),
                "vacation": vacation.to_string()
            }),
            reasoning: format!(
                "Leave {} day(s) = ${}; vacation {} day(s) = ${}",
                leave_days, leave, vacation_days, vacation
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_incapacity_within_full_pay_days() {
        assert_eq!(calculate_incapacity_pay(dec("3000000"), 1), dec("100000"));
        assert_eq!(calculate_incapacity_pay(dec("3000000"), 2), dec("200000"));
    }

    #[test]
    fn test_incapacity_beyond_two_days_is_two_thirds() {
        // daily 47,450; 2 × 47,450 = 94,900; 1 × 31,633.33 = 31,633
        assert_eq!(calculate_incapacity_pay(dec("1423500"), 3), dec("126533"));
    }

    #[test]
    fn test_no_incapacity_is_zero() {
        assert_eq!(calculate_incapacity_pay(dec("1423500"), 0), Decimal::ZERO);
    }

    #[test]
    fn test_leave_and_vacation_at_full_daily_rate() {
        let result = calculate_absence_pay(dec("3000000"), 0, 2, 5, 4);
        assert_eq!(result.leave, dec("200000"));
        assert_eq!(result.vacation, dec("500000"));
        assert_eq!(result.incapacity, Decimal::ZERO);
        assert_eq!(result.incapacity_step.step_number, 4);
        assert_eq!(result.leave_step.step_number, 5);
    }
}
