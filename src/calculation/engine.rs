//! The calculation engine: one employee, one pay period.
//!
//! [`calculate_payroll`] runs every rule in order and assembles the full
//! devengados/deducciones/aportes/provisiones breakdown together with its
//! audit trace. It is a pure function; callers validate that the employee
//! is active and the period exists before invoking it.

use std::time::Instant;

use rust_decimal::Decimal;

use crate::benefits::calculate_monthly_provisions;
use crate::config::StatutoryConstants;
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, Deductions, Earnings, Employee, EntryInputs,
    PayrollBreakdown, RiskLevel, SalaryType,
};

use super::absences::calculate_absence_pay;
use super::contribution_base::{calculate_contribution_base, validate_integral_salary};
use super::employer_contributions::calculate_employer_contributions;
use super::overtime::calculate_overtime;
use super::salary::{calculate_basic_salary, calculate_transport_allowance};
use super::social_security::{calculate_social_security, calculate_solidarity_fund};
use super::withholding::calculate_withholding;

/// Everything the engine needs to calculate one entry.
#[derive(Debug, Clone, Copy)]
pub struct CalculationInput<'a> {
    /// Monthly base salary.
    pub base_salary: Decimal,
    /// Ordinary or integral.
    pub salary_type: SalaryType,
    /// ARL tier.
    pub risk_level: RiskLevel,
    /// Whether the employee receives the transport allowance.
    pub has_transport_allowance: bool,
    /// Statutory constants in force.
    pub constants: &'a StatutoryConstants,
    /// Days worked and novelties for the period.
    pub inputs: &'a EntryInputs,
}

impl<'a> CalculationInput<'a> {
    /// Builds the input from an employee record.
    pub fn from_employee(
        employee: &Employee,
        constants: &'a StatutoryConstants,
        inputs: &'a EntryInputs,
    ) -> Self {
        Self {
            base_salary: employee.base_salary,
            salary_type: employee.salary_type,
            risk_level: employee.risk_level,
            has_transport_allowance: employee.has_transport_allowance,
            constants,
            inputs,
        }
    }
}

/// Calculates the complete payroll breakdown for one employee.
///
/// Every monetary figure is rounded to whole pesos as it is produced, so
/// `earnings.total - deductions.total == net_pay` holds exactly.
///
/// # Examples
///
/// ```
/// use nomina_engine::calculation::{CalculationInput, calculate_payroll};
/// use nomina_engine::config::StatutoryConstants;
/// use nomina_engine::models::{EntryInputs, RiskLevel, SalaryType};
/// use rust_decimal::Decimal;
///
/// let constants = StatutoryConstants {
///     minimum_wage: Decimal::from(1_423_500),
///     transport_allowance: Decimal::from(200_000),
///     uvt_value: Decimal::from(49_799),
/// };
/// let inputs = EntryInputs::for_days(30);
/// let breakdown = calculate_payroll(&CalculationInput {
///     base_salary: Decimal::from(1_423_500),
///     salary_type: SalaryType::Ordinary,
///     risk_level: RiskLevel::Level1,
///     has_transport_allowance: true,
///     constants: &constants,
///     inputs: &inputs,
/// });
///
/// assert_eq!(breakdown.earnings.total, Decimal::from(1_623_500));
/// assert_eq!(breakdown.deductions.total, Decimal::from(113_880));
/// assert_eq!(breakdown.net_pay, Decimal::from(1_509_620));
/// ```
pub fn calculate_payroll(input: &CalculationInput<'_>) -> PayrollBreakdown {
    let start_time = Instant::now();
    let inputs = input.inputs;
    let constants = input.constants;
    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();
    let mut step_number: u32 = 1;

    if input.salary_type == SalaryType::Integral {
        if let Err(err) = validate_integral_salary(input.base_salary, constants.minimum_wage) {
            warnings.push(AuditWarning {
                code: "INTEGRAL_BELOW_MINIMUM".to_string(),
                message: err.to_string(),
                severity: "high".to_string(),
            });
        }
    }

    // Devengados
    let salary = calculate_basic_salary(input.base_salary, inputs.days_worked, step_number);
    steps.push(salary.audit_step);
    step_number += 1;

    let transport = calculate_transport_allowance(
        input.has_transport_allowance,
        constants.transport_allowance,
        inputs.days_worked,
        step_number,
    );
    steps.push(transport.audit_step);
    step_number += 1;

    let overtime = calculate_overtime(
        input.base_salary,
        input.salary_type,
        &inputs.overtime,
        step_number,
    );
    steps.push(overtime.audit_step);
    step_number += 1;

    let absences = calculate_absence_pay(
        input.base_salary,
        inputs.incapacity_days,
        inputs.leave_days,
        inputs.vacation_days,
        step_number,
    );
    steps.push(absences.incapacity_step);
    steps.push(absences.leave_step);
    step_number += 2;

    let mut earnings = Earnings {
        salary: salary.amount,
        transport_allowance: transport.amount,
        overtime: overtime.lines,
        overtime_total: overtime.total,
        incapacity: absences.incapacity,
        leave: absences.leave,
        vacation: absences.vacation,
        bonuses: inputs.bonuses,
        commissions: inputs.commissions,
        per_diem: inputs.per_diem,
        other_earnings: inputs.other_earnings,
        total: Decimal::ZERO,
    };
    earnings.total = earnings.salary
        + earnings.transport_allowance
        + earnings.overtime_total
        + earnings.incapacity
        + earnings.leave
        + earnings.vacation
        + earnings.bonuses
        + earnings.commissions
        + earnings.per_diem
        + earnings.other_earnings;

    // IBC
    let ibc = calculate_contribution_base(
        input.salary_type,
        input.base_salary,
        inputs.days_worked,
        earnings.total,
        earnings.transport_allowance,
        step_number,
    );
    steps.push(ibc.audit_step);
    step_number += 1;
    let contribution_base = ibc.ibc;

    // Deducciones
    let social_security = calculate_social_security(contribution_base, step_number);
    steps.push(social_security.audit_step);
    step_number += 1;

    let solidarity =
        calculate_solidarity_fund(contribution_base, constants.minimum_wage, step_number);
    steps.push(solidarity.audit_step);
    step_number += 1;

    let mandatory = social_security.health + social_security.pension + solidarity.amount;
    let withholding = calculate_withholding(
        earnings.total,
        earnings.transport_allowance,
        mandatory,
        constants.uvt_value,
        step_number,
    );
    steps.push(withholding.audit_step);
    step_number += 1;

    let mut deductions = Deductions {
        health: social_security.health,
        pension: social_security.pension,
        solidarity_fund: solidarity.amount,
        solidarity_rate: solidarity.rate,
        withholding: withholding.amount,
        union_dues: inputs.union_dues,
        loans: inputs.loans,
        other_deductions: inputs.other_deductions,
        total: Decimal::ZERO,
    };
    deductions.total = deductions.health
        + deductions.pension
        + deductions.solidarity_fund
        + deductions.withholding
        + deductions.union_dues
        + deductions.loans
        + deductions.other_deductions;

    // Aportes
    let employer =
        calculate_employer_contributions(contribution_base, input.risk_level, step_number);
    steps.push(employer.audit_step);
    step_number += 1;

    // Provisiones
    let provisions = calculate_monthly_provisions(
        input.salary_type,
        contribution_base,
        input.base_salary,
        inputs.days_worked,
        step_number,
    );
    steps.push(provisions.audit_step);

    let net_pay = earnings.total - deductions.total;
    if net_pay < Decimal::ZERO {
        warnings.push(AuditWarning {
            code: "NEGATIVE_NET_PAY".to_string(),
            message: format!(
                "Deductions ${} exceed earnings ${}",
                deductions.total, earnings.total
            ),
            severity: "high".to_string(),
        });
    }

    PayrollBreakdown {
        days_worked: inputs.days_worked,
        contribution_base,
        earnings,
        deductions,
        employer_contributions: employer.contributions,
        provisions: provisions.provisions,
        net_pay,
        audit_trace: AuditTrace {
            steps,
            warnings,
            duration_us: start_time.elapsed().as_micros() as u64,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OvertimeDetail, OvertimeType};
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn constants() -> StatutoryConstants {
        StatutoryConstants {
            minimum_wage: dec("1423500"),
            transport_allowance: dec("200000"),
            uvt_value: dec("49799"),
        }
    }

    fn run(
        base_salary: &str,
        salary_type: SalaryType,
        transport: bool,
        inputs: &EntryInputs,
    ) -> PayrollBreakdown {
        let constants = constants();
        calculate_payroll(&CalculationInput {
            base_salary: dec(base_salary),
            salary_type,
            risk_level: RiskLevel::Level1,
            has_transport_allowance: transport,
            constants: &constants,
            inputs,
        })
    }

    #[test]
    fn test_minimum_wage_full_month() {
        let b = run("1423500", SalaryType::Ordinary, true, &EntryInputs::for_days(30));

        assert_eq!(b.earnings.salary, dec("1423500"));
        assert_eq!(b.earnings.transport_allowance, dec("200000"));
        assert_eq!(b.earnings.total, dec("1623500"));
        assert_eq!(b.contribution_base, dec("1423500"));
        assert_eq!(b.deductions.health, dec("56940"));
        assert_eq!(b.deductions.pension, dec("56940"));
        assert_eq!(b.deductions.solidarity_fund, Decimal::ZERO);
        assert_eq!(b.deductions.withholding, Decimal::ZERO);
        assert_eq!(b.deductions.total, dec("113880"));
        assert_eq!(b.net_pay, dec("1509620"));

        assert_eq!(b.employer_contributions.health, dec("120998"));
        assert_eq!(b.employer_contributions.occupational_risk, dec("7431"));
        assert_eq!(b.provisions.service_bonus, dec("118578"));
        assert_eq!(b.provisions.severance_interest, dec("1186"));
        assert_eq!(b.provisions.vacation, dec("59313"));
    }

    #[test]
    fn test_audit_trace_has_every_rule() {
        let b = run("1423500", SalaryType::Ordinary, true, &EntryInputs::for_days(30));
        let rule_ids: Vec<&str> = b
            .audit_trace
            .steps
            .iter()
            .map(|s| s.rule_id.as_str())
            .collect();
        assert_eq!(
            rule_ids,
            vec![
                "basic_salary",
                "transport_allowance",
                "overtime",
                "incapacity",
                "leave_and_vacation",
                "contribution_base",
                "social_security",
                "solidarity_fund",
                "withholding",
                "employer_contributions",
                "provisions",
            ]
        );
        for (i, step) in b.audit_trace.steps.iter().enumerate() {
            assert_eq!(step.step_number, i as u32 + 1);
        }
        assert!(b.audit_trace.warnings.is_empty());
    }

    #[test]
    fn test_high_salary_pays_solidarity_and_withholding() {
        let b = run("10000000", SalaryType::Ordinary, false, &EntryInputs::for_days(30));
        assert_eq!(b.deductions.solidarity_fund, dec("100000"));
        assert_eq!(b.deductions.solidarity_rate, dec("0.01"));
        assert_eq!(b.deductions.withholding, dec("397878"));
        assert_eq!(b.deductions.total, dec("1297878"));
        assert_eq!(b.net_pay, dec("8702122"));
    }

    #[test]
    fn test_novelties_flow_into_earnings_and_ibc() {
        let inputs = EntryInputs {
            days_worked: 30,
            overtime: vec![OvertimeDetail {
                overtime_type: OvertimeType::Day,
                hours: dec("3"),
            }],
            bonuses: dec("100000"),
            union_dues: dec("15000"),
            ..Default::default()
        };
        let b = run("1423500", SalaryType::Ordinary, true, &inputs);

        assert_eq!(b.earnings.overtime_total, dec("22242"));
        assert_eq!(b.earnings.total, dec("1745742"));
        assert_eq!(b.contribution_base, dec("1545742"));
        assert_eq!(b.deductions.union_dues, dec("15000"));
        assert_eq!(b.earnings.total - b.deductions.total, b.net_pay);
    }

    #[test]
    fn test_integral_salary() {
        let inputs = EntryInputs {
            days_worked: 30,
            overtime: vec![OvertimeDetail {
                overtime_type: OvertimeType::Night,
                hours: dec("5"),
            }],
            ..Default::default()
        };
        let b = run("20000000", SalaryType::Integral, false, &inputs);

        assert_eq!(b.earnings.overtime_total, Decimal::ZERO);
        assert_eq!(b.contribution_base, dec("14000000"));
        assert_eq!(b.provisions.total(), Decimal::ZERO);
        assert!(b.audit_trace.warnings.is_empty());
    }

    #[test]
    fn test_integral_below_minimum_warns() {
        let b = run("15000000", SalaryType::Integral, false, &EntryInputs::for_days(30));
        assert_eq!(b.audit_trace.warnings.len(), 1);
        assert_eq!(b.audit_trace.warnings[0].code, "INTEGRAL_BELOW_MINIMUM");
    }

    #[test]
    fn test_negative_net_pay_warns() {
        let inputs = EntryInputs {
            days_worked: 30,
            loans: dec("5000000"),
            ..Default::default()
        };
        let b = run("1423500", SalaryType::Ordinary, true, &inputs);
        assert!(b.net_pay < Decimal::ZERO);
        assert!(b
            .audit_trace
            .warnings
            .iter()
            .any(|w| w.code == "NEGATIVE_NET_PAY"));
    }

    #[test]
    fn test_vacation_provision_excludes_transport_allowance() {
        let with = run("1423500", SalaryType::Ordinary, true, &EntryInputs::for_days(30));
        let without = run("1423500", SalaryType::Ordinary, false, &EntryInputs::for_days(30));
        assert_eq!(with.provisions.vacation, without.provisions.vacation);
        assert_eq!(with.provisions.vacation, dec("59313"));
    }

    #[test]
    fn test_half_month_provisions() {
        let full = run("2000000", SalaryType::Ordinary, true, &EntryInputs::for_days(30));
        let half = run("2000000", SalaryType::Ordinary, true, &EntryInputs::for_days(15));
        // 2,000,000 × 8.33% = 166,600; / 24 = 83,333.33
        assert_eq!(full.provisions.service_bonus, dec("166600"));
        assert_eq!(half.provisions.service_bonus, dec("83300"));
        assert_eq!(half.provisions.severance, dec("83300"));
        assert_eq!(full.provisions.vacation, dec("83333"));
        assert_eq!(half.provisions.vacation, dec("41667"));
    }

    proptest! {
        #[test]
        fn prop_ordinary_net_balances(
            salary in 1_423_500i64..40_000_000i64,
            bonuses in 0i64..2_000_000i64,
            day_hours in 0u32..40u32,
            transport in any::<bool>(),
        ) {
            let inputs = EntryInputs {
                days_worked: 30,
                overtime: vec![OvertimeDetail {
                    overtime_type: OvertimeType::Day,
                    hours: Decimal::from(day_hours),
                }],
                bonuses: Decimal::from(bonuses),
                ..Default::default()
            };
            let b = run(&salary.to_string(), SalaryType::Ordinary, transport, &inputs);

            prop_assert_eq!(b.earnings.total - b.deductions.total, b.net_pay);
            prop_assert_eq!(
                b.provisions.severance_interest,
                crate::calculation::round_currency(b.provisions.severance * dec("0.01"))
            );
            prop_assert_eq!(b.net_pay.scale(), 0);
        }

        #[test]
        fn prop_integral_has_no_provisions_or_overtime(
            salary in 18_505_500i64..80_000_000i64,
            days in 1u32..=30u32,
            hours in 0u32..60u32,
        ) {
            let inputs = EntryInputs {
                days_worked: days,
                overtime: vec![OvertimeDetail {
                    overtime_type: OvertimeType::HolidayNightSpecial,
                    hours: Decimal::from(hours),
                }],
                ..Default::default()
            };
            let b = run(&salary.to_string(), SalaryType::Integral, false, &inputs);

            prop_assert_eq!(b.provisions.total(), Decimal::ZERO);
            prop_assert_eq!(b.earnings.overtime_total, Decimal::ZERO);
            prop_assert_eq!(b.earnings.total - b.deductions.total, b.net_pay);
        }
    }
}
