//! Basic salary and transport allowance.
//!
//! Both are monthly amounts prorated by days worked out of 30.

use rust_decimal::Decimal;

use crate::models::AuditStep;

use super::proration::{DAYS_PER_MONTH, prorate};

/// The result of prorating the basic salary.
#[derive(Debug, Clone)]
pub struct BasicSalaryResult {
    /// Salary earned for the days worked.
    pub amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// The result of prorating the transport allowance.
#[derive(Debug, Clone)]
pub struct TransportAllowanceResult {
    /// Allowance earned for the days worked (zero if not entitled).
    pub amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the basic salary (sueldo) for the days worked.
///
/// # Examples
///
/// ```
/// use nomina_engine::calculation::calculate_basic_salary;
/// use rust_decimal::Decimal;
///
/// let result = calculate_basic_salary(Decimal::from(1_423_500), 15, 1);
/// assert_eq!(result.amount, Decimal::from(711_750));
/// assert_eq!(result.audit_step.rule_id, "basic_salary");
/// ```
pub fn calculate_basic_salary(
    base_salary: Decimal,
    days_worked: u32,
    step_number: u32,
) -> BasicSalaryResult {
    let amount = prorate(base_salary, days_worked);
    let full_month = days_worked >= DAYS_PER_MONTH;

    let reasoning = if full_month {
        format!("Full month worked: salary ${}", amount)
    } else {
        format!(
            "${} × {} / {} days = ${}",
            base_salary, days_worked, DAYS_PER_MONTH, amount
        )
    };

    BasicSalaryResult {
        amount,
        audit_step: AuditStep {
            step_number,
            rule_id: "basic_salary".to_string(),
            rule_name: "Basic Salary".to_string(),
            legal_ref: "CST art. 127, 134".to_string(),
            input: serde_json::json!({
                "base_salary": base_salary.to_string(),
                "days_worked": days_worked
            }),
            output: serde_json::json!({
                "salary": amount.to_string(),
                "full_month": full_month
            }),
            reasoning,
        },
    }
}

/// Calculates the transport allowance (auxilio de transporte) for the days worked.
///
/// Employee management decides entitlement from the salary threshold; this
/// function only prorates.
pub fn calculate_transport_allowance(
    entitled: bool,
    allowance_value: Decimal,
    days_worked: u32,
    step_number: u32,
) -> TransportAllowanceResult {
    let amount = if entitled {
        prorate(allowance_value, days_worked)
    } else {
        Decimal::ZERO
    };

    let reasoning = if entitled {
        format!(
            "Entitled to transport allowance: ${} prorated over {} days = ${}",
            allowance_value, days_worked, amount
        )
    } else {
        "Employee is not entitled to transport allowance".to_string()
    };

    TransportAllowanceResult {
        amount,
        audit_step: AuditStep {
            step_number,
            rule_id: "transport_allowance".to_string(),
            rule_name: "Transport Allowance".to_string(),
            legal_ref: "Ley 15 de 1959".to_string(),
            input: serde_json::json!({
                "entitled": entitled,
                "allowance_value": allowance_value.to_string(),
                "days_worked": days_worked
            }),
            output: serde_json::json!({
                "transport_allowance": amount.to_string()
            }),
            reasoning,
        },
    }
}
