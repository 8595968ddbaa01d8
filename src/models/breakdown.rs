//! Payroll breakdown models.
//!
//! This module contains the [`PayrollBreakdown`] type and its associated
//! structures that capture every output of one employee's payroll
//! calculation: devengados (earnings), deducciones (deductions), aportes
//! (employer contributions), provisiones (benefit provisions) and the
//! audit trace explaining each figure.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::OvertimeType;

/// One priced overtime detail.
///
/// # Example
///
/// ```
/// use nomina_engine::models::{OvertimeLine, OvertimeType};
/// use rust_decimal::Decimal;
///
/// let line = OvertimeLine {
///     overtime_type: OvertimeType::Day,
///     hours: Decimal::from(2),
///     multiplier: Decimal::new(125, 2),
///     amount: Decimal::from(14828),
/// };
/// assert_eq!(line.overtime_type.code(), "HED");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeLine {
    /// The kind of overtime.
    pub overtime_type: OvertimeType,
    /// Hours worked.
    pub hours: Decimal,
    /// Multiplier applied to the hourly rate (e.g. 1.25).
    pub multiplier: Decimal,
    /// Amount paid, in whole pesos.
    pub amount: Decimal,
}

/// Devengados: everything the employee earned in the period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Earnings {
    /// Basic salary for the days worked.
    pub salary: Decimal,
    /// Transport allowance for the days worked.
    pub transport_allowance: Decimal,
    /// Individually priced overtime.
    pub overtime: Vec<OvertimeLine>,
    /// Sum of the overtime lines.
    pub overtime_total: Decimal,
    /// Incapacity (sick leave) pay.
    pub incapacity: Decimal,
    /// Paid leave.
    pub leave: Decimal,
    /// Vacation days paid in the period.
    pub vacation: Decimal,
    /// Bonuses.
    pub bonuses: Decimal,
    /// Commissions.
    pub commissions: Decimal,
    /// Per-diem (viáticos).
    pub per_diem: Decimal,
    /// Other earnings.
    pub other_earnings: Decimal,
    /// Total devengado.
    pub total: Decimal,
}

/// Deducciones: everything withheld from the employee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deductions {
    /// Employee health contribution (4% of IBC).
    pub health: Decimal,
    /// Employee pension contribution (4% of IBC).
    pub pension: Decimal,
    /// Solidarity pension fund surcharge.
    pub solidarity_fund: Decimal,
    /// Rate applied for the solidarity fund (0 when not applicable).
    pub solidarity_rate: Decimal,
    /// Income-tax withholding.
    pub withholding: Decimal,
    /// Union dues.
    pub union_dues: Decimal,
    /// Payroll-deduction loans (libranzas).
    pub loans: Decimal,
    /// Other deductions.
    pub other_deductions: Decimal,
    /// Total deducido.
    pub total: Decimal,
}

/// Aportes: contributions the employer pays on top of salary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerContributions {
    /// Employer health contribution (8.5%).
    pub health: Decimal,
    /// Employer pension contribution (12%).
    pub pension: Decimal,
    /// Occupational risk insurance (ARL).
    pub occupational_risk: Decimal,
    /// Family compensation fund (4%).
    pub compensation_fund: Decimal,
    /// National training service, SENA (2%).
    pub training_fund: Decimal,
    /// Child welfare institute, ICBF (3%).
    pub child_welfare: Decimal,
    /// Total aportes.
    pub total: Decimal,
}

/// Provisiones: monthly accrual of the four statutory benefits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provisions {
    /// Prima de servicios.
    pub service_bonus: Decimal,
    /// Cesantías.
    pub severance: Decimal,
    /// Intereses sobre cesantías.
    pub severance_interest: Decimal,
    /// Vacaciones.
    pub vacation: Decimal,
}

impl Provisions {
    /// Sum of the four provisions.
    pub fn total(&self) -> Decimal {
        self.service_bonus + self.severance + self.severance_interest + self.vacation
    }

    /// Adds another set of provisions to this one.
    pub fn accumulate(&mut self, other: &Provisions) {
        self.service_bonus += other.service_bonus;
        self.severance += other.severance;
        self.severance_interest += other.severance_interest;
        self.vacation += other.vacation;
    }
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The legal provision backing this rule.
    pub legal_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate potential issues that don't prevent calculation
/// but may require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// The full result of calculating one employee's pay period.
///
/// Invariant: `earnings.total - deductions.total == net_pay`, all values in
/// whole pesos.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollBreakdown {
    /// Days paid.
    pub days_worked: u32,
    /// Contribution base (IBC).
    pub contribution_base: Decimal,
    /// Devengados.
    pub earnings: Earnings,
    /// Deducciones.
    pub deductions: Deductions,
    /// Aportes.
    pub employer_contributions: EmployerContributions,
    /// Provisiones.
    pub provisions: Provisions,
    /// Net pay (neto a pagar).
    pub net_pay: Decimal,
    /// Audit trace of every rule applied.
    pub audit_trace: AuditTrace,
}
