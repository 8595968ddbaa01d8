//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod benefits;
mod breakdown;
mod employee;
mod employer;
mod entry;
mod period;

pub use benefits::{BenefitPaymentResult, BenefitType, LiquidationItem, LiquidationPreview};
pub use breakdown::{
    AuditStep, AuditTrace, AuditWarning, Deductions, Earnings, EmployerContributions,
    OvertimeLine, PayrollBreakdown, Provisions,
};
pub use employee::{
    ContractType, Employee, EmployeeStatus, IdentificationType, PaymentInfo, RiskLevel,
    SalaryType, WorkLocation,
};
pub use employer::EmployerProfile;
pub use entry::{
    AdjustmentNoteType, AdjustmentReference, DocumentType, EntryInputs, EntryStatus, EntryUpdate,
    OvertimeDetail, OvertimeType, PayrollEntry, format_document_number,
};
pub use period::{
    MAX_PERIOD_DAYS, PayrollPeriod, PeriodStatus, PeriodTotals, PeriodType,
    calculate_period_days,
};
