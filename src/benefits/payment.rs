//! On-demand statutory benefit payments.
//!
//! | Benefit            | Formula                                   |
//! |--------------------|-------------------------------------------|
//! | Service bonus      | (salary + allowance) × days / 360         |
//! | Severance          | (salary + allowance) × days / 360         |
//! | Severance interest | severance × 12% × days / 360              |
//! | Vacation           | salary × days / 720                       |

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::calculation::round_currency;
use crate::config::StatutoryConstants;
use crate::error::{EngineError, EngineResult};
use crate::models::{BenefitPaymentResult, BenefitType, Employee};

use super::day_count::{DAYS_PER_YEAR, payment_window};

/// Annual interest rate on severance.
pub const SEVERANCE_INTEREST_RATE: Decimal = Decimal::from_parts(12, 0, 0, false, 2);

/// Vacation divisor: 15 working days per 360 days of service.
pub const VACATION_DAYS_DIVISOR: u32 = 720;

/// A benefit amount with its formula spelled out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenefitAmount {
    /// Amount in whole pesos.
    pub amount: Decimal,
    /// The formula with the actual figures substituted.
    pub formula: String,
}

/// Calculates the amount of one benefit for a number of 360-convention days.
///
/// ```
/// use nomina_engine::benefits::calculate_benefit_amount;
/// use nomina_engine::models::BenefitType;
/// use rust_decimal::Decimal;
///
/// let bonus = calculate_benefit_amount(
///     BenefitType::ServiceBonus,
///     Decimal::from(1_423_500),
///     Decimal::from(200_000),
///     180,
/// );
/// assert_eq!(bonus.amount, Decimal::from(811_750));
/// ```
pub fn calculate_benefit_amount(
    benefit: BenefitType,
    base_salary: Decimal,
    transport_allowance: Decimal,
    days: u32,
) -> BenefitAmount {
    let days_dec = Decimal::from(days);
    let year = Decimal::from(DAYS_PER_YEAR);
    let base_with_allowance = base_salary + transport_allowance;

    match benefit {
        BenefitType::ServiceBonus | BenefitType::Severance => {
            let amount = round_currency(base_with_allowance * days_dec / year);
            BenefitAmount {
                amount,
                formula: format!(
                    "{}: (${} + ${}) × {} / {} = ${}",
                    benefit.label(),
                    base_salary,
                    transport_allowance,
                    days,
                    DAYS_PER_YEAR,
                    amount
                ),
            }
        }
        BenefitType::SeveranceInterest => {
            let severance = round_currency(base_with_allowance * days_dec / year);
            let amount = round_currency(severance * SEVERANCE_INTEREST_RATE * days_dec / year);
            BenefitAmount {
                amount,
                formula: format!(
                    "{}: ${} × 12% × {} / {} = ${}",
                    benefit.label(),
                    severance,
                    days,
                    DAYS_PER_YEAR,
                    amount
                ),
            }
        }
        BenefitType::Vacation => {
            let amount =
                round_currency(base_salary * days_dec / Decimal::from(VACATION_DAYS_DIVISOR));
            BenefitAmount {
                amount,
                formula: format!(
                    "{}: ${} × {} / {} = ${}",
                    benefit.label(),
                    base_salary,
                    days,
                    VACATION_DAYS_DIVISOR,
                    amount
                ),
            }
        }
    }
}

/// Rejects employees without separate statutory benefits.
pub fn ensure_benefit_eligible(employee: &Employee) -> EngineResult<()> {
    if employee.is_integral() {
        return Err(EngineError::bad_request(format!(
            "Employee {} has an integral salary and accrues no separate statutory benefits",
            employee.id
        )));
    }
    Ok(())
}

/// The monthly transport allowance included in benefit bases.
pub fn allowance_for(employee: &Employee, constants: &StatutoryConstants) -> Decimal {
    if employee.has_transport_allowance {
        constants.transport_allowance
    } else {
        Decimal::ZERO
    }
}

/// Computes a single benefit disbursement as of a payment date.
pub fn compute_benefit_payment(
    employee: &Employee,
    constants: &StatutoryConstants,
    benefit: BenefitType,
    payment_date: NaiveDate,
) -> EngineResult<BenefitPaymentResult> {
    ensure_benefit_eligible(employee)?;

    let allowance = allowance_for(employee, constants);
    let window = payment_window(benefit, employee.start_date, employee.end_date, payment_date);
    let computed = calculate_benefit_amount(benefit, employee.base_salary, allowance, window.days);

    Ok(BenefitPaymentResult {
        employee_id: employee.id,
        benefit_type: benefit,
        payment_date,
        period_start: window.start,
        period_end: window.end,
        days: window.days,
        base_salary: employee.base_salary,
        transport_allowance: allowance,
        amount: computed.amount,
        formula: computed.formula,
    })
}
