//! Employee model and related types.
//!
//! Employees are owned by the surrounding employee-management module; the
//! payroll core only reads them. The types here carry exactly the
//! attributes payroll calculation and document generation need.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How an employee's salary is structured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalaryType {
    /// Ordinary salary with separate statutory benefits.
    Ordinary,
    /// Integral salary that already factors in benefits (≥ 13 SMMLV).
    Integral,
}

/// Occupational risk tier (ARL) of the employee's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Minimum risk.
    Level1,
    /// Low risk.
    Level2,
    /// Medium risk.
    Level3,
    /// High risk.
    Level4,
    /// Maximum risk.
    Level5,
}

impl RiskLevel {
    /// The tier number, 1 through 5.
    pub fn tier(self) -> u8 {
        match self {
            RiskLevel::Level1 => 1,
            RiskLevel::Level2 => 2,
            RiskLevel::Level3 => 3,
            RiskLevel::Level4 => 4,
            RiskLevel::Level5 => 5,
        }
    }
}

/// Lifecycle status of an employee as reported by employee management.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    /// Currently employed and included in payroll runs.
    Active,
    /// Temporarily excluded from payroll runs.
    Inactive,
    /// Employment has ended.
    Terminated,
}

/// Identification document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentificationType {
    /// Cédula de ciudadanía.
    CitizenshipCard,
    /// Cédula de extranjería.
    ForeignerId,
    /// Tarjeta de identidad.
    IdentityCard,
    /// Passport.
    Passport,
    /// Special permanence permit.
    SpecialPermit,
}

impl IdentificationType {
    /// The authority's code for this document type.
    pub fn code(self) -> &'static str {
        match self {
            IdentificationType::CitizenshipCard => "13",
            IdentificationType::ForeignerId => "22",
            IdentificationType::IdentityCard => "12",
            IdentificationType::Passport => "41",
            IdentificationType::SpecialPermit => "47",
        }
    }
}

/// Employment contract type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    /// Fixed term.
    FixedTerm,
    /// Indefinite term.
    Indefinite,
    /// For a specific work or labor.
    WorkOrLabor,
    /// Apprenticeship.
    Apprenticeship,
    /// Internship.
    Internship,
}

impl ContractType {
    /// The authority's code for this contract type.
    pub fn code(self) -> &'static str {
        match self {
            ContractType::FixedTerm => "1",
            ContractType::Indefinite => "2",
            ContractType::WorkOrLabor => "3",
            ContractType::Apprenticeship => "4",
            ContractType::Internship => "5",
        }
    }
}

/// Where the employee works.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkLocation {
    /// ISO country code (e.g. "CO").
    pub country_code: String,
    /// Department code (e.g. "11").
    pub department_code: String,
    /// Municipality code (e.g. "11001").
    pub municipality_code: String,
    /// Street address.
    pub address: String,
}

/// How the employee is paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInfo {
    /// Payment form code (1 = cash basis).
    #[serde(default = "default_payment_form")]
    pub form_code: String,
    /// Payment means code (e.g. "10" cash, "42" bank transfer).
    pub method_code: String,
    /// Bank name for transfers.
    #[serde(default)]
    pub bank_name: Option<String>,
    /// Account type for transfers.
    #[serde(default)]
    pub account_type: Option<String>,
    /// Account number for transfers.
    #[serde(default)]
    pub account_number: Option<String>,
}

fn default_payment_form() -> String {
    "1".to_string()
}

fn default_worker_type() -> String {
    "01".to_string()
}

fn default_worker_subtype() -> String {
    "00".to_string()
}

/// An employee as consumed by the payroll core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: Uuid,
    /// Identification document type.
    pub document_type: IdentificationType,
    /// Identification document number, unique per tenant.
    pub document_number: String,
    /// First name.
    pub first_name: String,
    /// Other given names.
    #[serde(default)]
    pub other_names: Option<String>,
    /// First surname.
    pub first_surname: String,
    /// Second surname.
    #[serde(default)]
    pub second_surname: Option<String>,
    /// Monthly base salary.
    pub base_salary: Decimal,
    /// Salary structure.
    pub salary_type: SalaryType,
    /// Occupational risk tier.
    pub risk_level: RiskLevel,
    /// Whether the employee receives the transport allowance.
    pub has_transport_allowance: bool,
    /// Contract type.
    pub contract_type: ContractType,
    /// Worker type code (e.g. "01" dependent).
    #[serde(default = "default_worker_type")]
    pub worker_type_code: String,
    /// Worker subtype code (e.g. "00" none).
    #[serde(default = "default_worker_subtype")]
    pub worker_subtype_code: String,
    /// Whether the job is classified as high pension risk.
    #[serde(default)]
    pub high_pension_risk: bool,
    /// Work location.
    pub work_location: WorkLocation,
    /// Payment details.
    pub payment: PaymentInfo,
    /// Hire date.
    pub start_date: NaiveDate,
    /// Termination date, if any.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Lifecycle status.
    pub status: EmployeeStatus,
}

impl Employee {
    /// Returns true if the employee is included in payroll runs.
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }

    /// Returns true if the employee has an integral salary.
    pub fn is_integral(&self) -> bool {
        self.salary_type == SalaryType::Integral
    }

    /// The employee's full name, given names first.
    pub fn full_name(&self) -> String {
        [
            Some(self.first_name.as_str()),
            self.other_names.as_deref(),
            Some(self.first_surname.as_str()),
            self.second_surname.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
    }
}
