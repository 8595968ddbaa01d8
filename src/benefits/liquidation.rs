//! Termination liquidation preview.
//!
//! Accrues all four benefits since their last reset up to the termination
//! date, then nets them against the provisions already posted on approved
//! and closed entries.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::StatutoryConstants;
use crate::error::EngineResult;
use crate::models::{BenefitType, Employee, LiquidationItem, LiquidationPreview, Provisions};

use super::day_count::liquidation_window;
use super::payment::{allowance_for, calculate_benefit_amount, ensure_benefit_eligible};

/// Builds the liquidation preview for an employee.
///
/// `posted` is the aggregate of provisions on the employee's APPROVED and
/// CLOSED entries.
pub fn build_liquidation_preview(
    employee: &Employee,
    constants: &StatutoryConstants,
    termination_date: NaiveDate,
    posted: Provisions,
) -> EngineResult<LiquidationPreview> {
    ensure_benefit_eligible(employee)?;

    let allowance = allowance_for(employee, constants);

    let items: Vec<LiquidationItem> = BenefitType::ALL
        .iter()
        .map(|&benefit| {
            let window = liquidation_window(benefit, employee.start_date, termination_date);
            let computed =
                calculate_benefit_amount(benefit, employee.base_salary, allowance, window.days);
            LiquidationItem {
                benefit_type: benefit,
                period_start: window.start,
                period_end: window.end,
                days: window.days,
                amount: computed.amount,
                formula: computed.formula,
            }
        })
        .collect();

    let total_benefits: Decimal = items.iter().map(|i| i.amount).sum();
    let total_provisions_posted = posted.total();

    Ok(LiquidationPreview {
        employee_id: employee.id,
        hire_date: employee.start_date,
        termination_date,
        base_salary: employee.base_salary,
        transport_allowance: allowance,
        items,
        total_benefits,
        provisions_posted: posted,
        total_provisions_posted,
        net_payable: total_benefits - total_provisions_posted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::SalaryType;
    use crate::test_support::sample_employee;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn constants() -> StatutoryConstants {
        StatutoryConstants {
            minimum_wage: dec("1423500"),
            transport_allowance: dec("200000"),
            uvt_value: dec("49799"),
        }
    }

    fn item(preview: &LiquidationPreview, benefit: BenefitType) -> &LiquidationItem {
        preview
            .items
            .iter()
            .find(|i| i.benefit_type == benefit)
            .unwrap()
    }

    #[test]
    fn test_full_year_window_matches_unprorated_formulas() {
        let employee = sample_employee(dec("1423500"), SalaryType::Ordinary, d(2025, 1, 1));
        let preview =
            build_liquidation_preview(&employee, &constants(), d(2025, 12, 31), Provisions::default())
                .unwrap();

        // Second semester only for the bonus
        assert_eq!(item(&preview, BenefitType::ServiceBonus).days, 180);
        assert_eq!(item(&preview, BenefitType::ServiceBonus).amount, dec("811750"));
        assert_eq!(item(&preview, BenefitType::Severance).amount, dec("1623500"));
        assert_eq!(item(&preview, BenefitType::SeveranceInterest).amount, dec("194820"));
        assert_eq!(item(&preview, BenefitType::Vacation).amount, dec("711750"));
        assert_eq!(preview.total_benefits, dec("3341820"));
        assert_eq!(preview.net_payable, preview.total_benefits);
    }

    #[test]
    fn test_net_payable_subtracts_posted_provisions() {
        let employee = sample_employee(dec("1423500"), SalaryType::Ordinary, d(2025, 1, 1));
        let posted = Provisions {
            service_bonus: dec("711468"),
            severance: dec("711468"),
            severance_interest: dec("7116"),
            vacation: dec("355878"),
        };
        let preview =
            build_liquidation_preview(&employee, &constants(), d(2025, 6, 30), posted.clone()).unwrap();

        assert_eq!(preview.total_provisions_posted, posted.total());
        assert_eq!(
            preview.net_payable,
            preview.total_benefits - preview.total_provisions_posted
        );
        assert_eq!(preview.items.len(), 4);
        assert!(preview.items.iter().all(|i| !i.formula.is_empty()));
    }

    #[test]
    fn test_integral_salary_rejected() {
        let employee = sample_employee(dec("20000000"), SalaryType::Integral, d(2024, 1, 1));
        let err =
            build_liquidation_preview(&employee, &constants(), d(2025, 6, 30), Provisions::default())
                .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn test_termination_before_hire_saturates_to_zero() {
        let employee = sample_employee(dec("1423500"), SalaryType::Ordinary, d(2025, 6, 1));
        let preview =
            build_liquidation_preview(&employee, &constants(), d(2025, 5, 31), Provisions::default())
                .unwrap();
        assert!(preview.items.iter().all(|i| i.days == 0));
        assert_eq!(preview.total_benefits, Decimal::ZERO);
    }
}
