//! Calculation logic for Colombian payroll.
//!
//! This module contains one file per rule family: salary and transport
//! allowance proration, overtime pricing, paid absences, the contribution
//! base (IBC), employee social-security deductions including the
//! solidarity fund, income-tax withholding and employer contributions.
//! [`calculate_payroll`] composes them into a full breakdown.

mod absences;
mod contribution_base;
mod employer_contributions;
mod engine;
mod overtime;
mod proration;
mod salary;
mod social_security;
mod withholding;

pub use absences::{
    AbsencePayResult, INCAPACITY_FULL_PAY_DAYS, calculate_absence_pay, calculate_incapacity_pay,
};
pub use contribution_base::{
    ContributionBaseResult, INTEGRAL_MINIMUM_MULTIPLE, INTEGRAL_SALARY_FACTOR,
    calculate_contribution_base, validate_integral_salary,
};
pub use employer_contributions::{
    CHILD_WELFARE_RATE, COMPENSATION_FUND_RATE, EMPLOYER_HEALTH_RATE, EMPLOYER_PENSION_RATE,
    EmployerContributionsResult, TRAINING_FUND_RATE, calculate_employer_contributions,
    occupational_risk_rate,
};
pub use engine::{CalculationInput, calculate_payroll};
pub use overtime::{MONTHLY_HOURS, OvertimeResult, calculate_overtime};
pub use proration::{DAYS_PER_MONTH, apply_rate, daily_rate, non_negative, prorate, round_currency};
pub use salary::{
    BasicSalaryResult, TransportAllowanceResult, calculate_basic_salary,
    calculate_transport_allowance,
};
pub use social_security::{
    EMPLOYEE_HEALTH_RATE, EMPLOYEE_PENSION_RATE, SOLIDARITY_BASE_RATE,
    SOLIDARITY_THRESHOLD_MULTIPLE, SocialSecurityResult, SolidarityFundResult,
    calculate_social_security, calculate_solidarity_fund, solidarity_rate,
};
pub use withholding::{
    EXEMPT_INCOME_RATE, WITHHOLDING_BRACKETS, WithholdingBracket, WithholdingResult,
    calculate_withholding, find_bracket,
};
