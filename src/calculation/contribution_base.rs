//! Contribution base (IBC, ingreso base de cotización).
//!
//! Every social-security and parafiscal rate is applied to the IBC.
//!
//! - Ordinary salary: IBC = total earned − transport allowance.
//! - Integral salary: IBC = 70% of the base salary, prorated by days worked.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, SalaryType};

use super::proration::{non_negative, prorate};

/// Share of an integral salary that counts as salary for contributions.
pub const INTEGRAL_SALARY_FACTOR: Decimal = Decimal::from_parts(7, 0, 0, false, 1);

/// Minimum integral salary, in multiples of the minimum wage.
pub const INTEGRAL_MINIMUM_MULTIPLE: u32 = 13;

/// The result of computing the contribution base.
#[derive(Debug, Clone)]
pub struct ContributionBaseResult {
    /// The IBC in whole pesos.
    pub ibc: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the IBC for one period.
///
/// # Examples
///
/// ```
/// use nomina_engine::calculation::calculate_contribution_base;
/// use nomina_engine::models::SalaryType;
/// use rust_decimal::Decimal;
///
/// let result = calculate_contribution_base(
///     SalaryType::Ordinary,
///     Decimal::from(1_423_500),
///     30,
///     Decimal::from(1_623_500),
///     Decimal::from(200_000),
///     1,
/// );
/// assert_eq!(result.ibc, Decimal::from(1_423_500));
/// ```
pub fn calculate_contribution_base(
    salary_type: SalaryType,
    base_salary: Decimal,
    days_worked: u32,
    total_earned: Decimal,
    transport_allowance: Decimal,
    step_number: u32,
) -> ContributionBaseResult {
    let (ibc, reasoning) = match salary_type {
        SalaryType::Ordinary => {
            let ibc = non_negative(total_earned - transport_allowance);
            (
                ibc,
                format!(
                    "Ordinary salary: ${} earned − ${} transport allowance = ${}",
                    total_earned, transport_allowance, ibc
                ),
            )
        }
        SalaryType::Integral => {
            let ibc = prorate(base_salary * INTEGRAL_SALARY_FACTOR, days_worked);
            (
                ibc,
                format!(
                    "Integral salary: 70% of ${} prorated over {} days = ${}",
                    base_salary, days_worked, ibc
                ),
            )
        }
    };

    ContributionBaseResult {
        ibc,
        audit_step: AuditStep {
            step_number,
            rule_id: "contribution_base".to_string(),
            rule_name: "Contribution Base (IBC)".to_string(),
            legal_ref: "Ley 100 de 1993 art. 18; CST art. 132".to_string(),
            input: serde_json::json!({
                "salary_type": salary_type,
                "base_salary": base_salary.to_string(),
                "days_worked": days_worked,
                "total_earned": total_earned.to_string(),
                "transport_allowance": transport_allowance.to_string()
            }),
            output: serde_json::json!({ "ibc": ibc.to_string() }),
            reasoning,
        },
    }
}

/// Checks that an integral salary meets the statutory minimum of 13× SMMLV.
///
/// The calculation engine does not call this; employee management does
/// before accepting an integral-salary contract.
///
/// ```
/// use nomina_engine::calculation::validate_integral_salary;
/// use rust_decimal::Decimal;
///
/// let smmlv = Decimal::from(1_423_500);
/// assert!(validate_integral_salary(Decimal::from(18_505_500), smmlv).is_ok());
/// assert!(validate_integral_salary(Decimal::from(18_505_499), smmlv).is_err());
/// ```
pub fn validate_integral_salary(base_salary: Decimal, minimum_wage: Decimal) -> EngineResult<()> {
    let minimum = minimum_wage * Decimal::from(INTEGRAL_MINIMUM_MULTIPLE);
    if base_salary < minimum {
        return Err(EngineError::bad_request(format!(
            "Integral salary ${} is below the minimum of {}× SMMLV (${})",
            base_salary, INTEGRAL_MINIMUM_MULTIPLE, minimum
        )));
    }
    Ok(())
}
