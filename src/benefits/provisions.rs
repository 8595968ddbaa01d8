//! Monthly provision accrual.
//!
//! The same formulas back both the per-entry provisions and the benefit
//! windows, so period totals and benefit accruals never drift apart.
//!
//! - Prima de servicios: 8.33% of the IBC.
//! - Cesantías: 8.33% of the IBC.
//! - Intereses sobre cesantías: 1% of the cesantías provision.
//! - Vacaciones: prorated base salary / 24 (transport allowance excluded).
//!
//! Integral-salary employees accrue no provisions.

use rust_decimal::Decimal;

use crate::calculation::{apply_rate, prorate, round_currency};
use crate::models::{AuditStep, Provisions, SalaryType};

/// Monthly accrual rate for the service bonus and severance.
pub const MONTHLY_ACCRUAL_RATE: Decimal = Decimal::from_parts(833, 0, 0, false, 4);

/// Monthly severance interest accrual, as a share of the severance provision.
pub const SEVERANCE_INTEREST_MONTHLY_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Divisor applied to the salary for the vacation provision.
pub const VACATION_DIVISOR: u32 = 24;

/// The result of computing monthly provisions.
#[derive(Debug, Clone)]
pub struct ProvisionsResult {
    /// The four provisions.
    pub provisions: Provisions,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the monthly provisions for one entry.
///
/// # Examples
///
/// ```
/// use nomina_engine::benefits::calculate_monthly_provisions;
/// use nomina_engine::models::SalaryType;
/// use rust_decimal::Decimal;
///
/// let result = calculate_monthly_provisions(
///     SalaryType::Ordinary,
///     Decimal::from(1_423_500),
///     Decimal::from(1_423_500),
///     30,
///     1,
/// );
/// assert_eq!(result.provisions.service_bonus, Decimal::from(118_578));
/// assert_eq!(result.provisions.severance_interest, Decimal::from(1_186));
/// assert_eq!(result.provisions.vacation, Decimal::from(59_313));
/// ```
pub fn calculate_monthly_provisions(
    salary_type: SalaryType,
    ibc: Decimal,
    base_salary: Decimal,
    days_worked: u32,
    step_number: u32,
) -> ProvisionsResult {
    if salary_type == SalaryType::Integral {
        return ProvisionsResult {
            provisions: Provisions::default(),
            audit_step: AuditStep {
                step_number,
                rule_id: "provisions".to_string(),
                rule_name: "Benefit Provisions".to_string(),
                legal_ref: "CST art. 132".to_string(),
                input: serde_json::json!({ "salary_type": salary_type }),
                output: serde_json::to_value(Provisions::default()).unwrap_or_default(),
                reasoning: "Integral salary already includes benefits; no provisions accrued"
                    .to_string(),
            },
        };
    }

    let service_bonus = apply_rate(ibc, MONTHLY_ACCRUAL_RATE);
    let severance = apply_rate(ibc, MONTHLY_ACCRUAL_RATE);
    let severance_interest = apply_rate(severance, SEVERANCE_INTEREST_MONTHLY_RATE);
    let salary = prorate(base_salary, days_worked);
    let vacation = round_currency(salary / Decimal::from(VACATION_DIVISOR));

    let provisions = Provisions {
        service_bonus,
        severance,
        severance_interest,
        vacation,
    };

    ProvisionsResult {
        audit_step: AuditStep {
            step_number,
            rule_id: "provisions".to_string(),
            rule_name: "Benefit Provisions".to_string(),
            legal_ref: "CST art. 186, 249, 306; Ley 52 de 1975".to_string(),
            input: serde_json::json!({
                "ibc": ibc.to_string(),
                "base_salary": base_salary.to_string(),
                "days_worked": days_worked
            }),
            output: serde_json::to_value(&provisions).unwrap_or_default(),
            reasoning: format!(
                "Prima 8.33% × ${} = ${}; cesantías 8.33% × ${} = ${}; intereses 1% × ${} = ${}; vacaciones ${} / 24 = ${}",
                ibc,
                service_bonus,
                ibc,
                severance,
                severance,
                severance_interest,
                salary,
                vacation
            ),
        },
        provisions,
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
    fn test_minimum_wage_full_month() {
        let result =
            calculate_monthly_provisions(SalaryType::Ordinary, dec("1423500"), dec("1423500"), 30, 1);
        let p = &result.provisions;
        assert_eq!(p.service_bonus, dec("118578"));
        assert_eq!(p.severance, dec("118578"));
        assert_eq!(p.severance_interest, dec("1186"));
        assert_eq!(p.vacation, dec("59313"));
        assert_eq!(p.total(), dec("297655"));
    }

    #[test]
    fn test_half_month_is_half_the_unrounded_full_month() {
        let base = dec("1423500");
        let half = calculate_monthly_provisions(SalaryType::Ordinary, dec("711750"), base, 15, 1);
        let p = &half.provisions;
        assert_eq!(p.service_bonus, round_currency(base * MONTHLY_ACCRUAL_RATE / dec("2")));
        assert_eq!(p.severance, round_currency(base * MONTHLY_ACCRUAL_RATE / dec("2")));
        assert_eq!(p.vacation, round_currency(base / dec("24") / dec("2")));
    }

    #[test]
    fn test_vacation_ignores_ibc_extras() {
        // IBC includes overtime; the vacation provision only sees base salary
        let result =
            calculate_monthly_provisions(SalaryType::Ordinary, dec("1800000"), dec("1423500"), 30, 1);
        assert_eq!(result.provisions.vacation, dec("59313"));
        assert_eq!(result.provisions.service_bonus, dec("149940"));
    }

    #[test]
    fn test_integral_salary_has_no_provisions() {
        let result =
            calculate_monthly_provisions(SalaryType::Integral, dec("14000000"), dec("20000000"), 30, 1);
        assert_eq!(result.provisions, Provisions::default());
        assert!(result.audit_step.reasoning.contains("Integral"));
    }
}
