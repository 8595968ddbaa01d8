//! Configuration types for payroll calculation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from a tenant's YAML configuration files.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Employee, EmployerProfile};

/// Statutory values published yearly by the government.
///
/// These are the only figures the calculation engine takes from
/// configuration; percentages fixed by law live next to the formulas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatutoryConstants {
    /// Monthly minimum wage (SMMLV).
    pub minimum_wage: Decimal,
    /// Monthly transport allowance for entitled employees.
    pub transport_allowance: Decimal,
    /// Tax unit value (UVT) used by the withholding brackets.
    pub uvt_value: Decimal,
}

/// Prefixes and starting point for payroll document numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentNumbering {
    /// Prefix for individual payroll documents (e.g. "NOM").
    pub individual_prefix: String,
    /// Prefix for adjustment notes (e.g. "NAJ").
    pub adjustment_prefix: String,
    /// First entry number handed out for the tenant.
    #[serde(default = "default_starting_number")]
    pub starting_number: u64,
}

fn default_starting_number() -> u64 {
    1
}

/// The tax-authority environment a document is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Production environment (code 1).
    Production,
    /// Habilitation/test environment (code 2).
    Test,
}

impl Environment {
    /// The numeric code the authority uses for this environment.
    pub fn code(self) -> &'static str {
        match self {
            Environment::Production => "1",
            Environment::Test => "2",
        }
    }
}

/// Credentials of the registered payroll software.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftwareCredentials {
    /// Software identifier assigned by the authority.
    pub software_id: String,
    /// Software PIN, part of the CUNE input.
    pub pin: String,
    /// Test-set identifier used during habilitation.
    #[serde(default)]
    pub test_set_id: Option<String>,
    /// Target environment.
    pub environment: Environment,
}

/// The active payroll configuration of one tenant.
///
/// # Example
///
/// ```
/// use nomina_engine::config::PayrollConfig;
///
/// let yaml = r#"
/// effective_date: 2026-01-01
/// constants:
///   minimum_wage: "1423500"
///   transport_allowance: "200000"
///   uvt_value: "52374"
/// numbering:
///   individual_prefix: NOM
///   adjustment_prefix: NAJ
/// "#;
/// let config: PayrollConfig = serde_yaml::from_str(yaml).unwrap();
/// assert_eq!(config.numbering.starting_number, 1);
/// assert!(config.software.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollConfig {
    /// The date from which this configuration version applies.
    pub effective_date: NaiveDate,
    /// Statutory constants for the year.
    pub constants: StatutoryConstants,
    /// Document numbering state.
    pub numbering: DocumentNumbering,
    /// Registered software credentials, required for document generation.
    #[serde(default)]
    pub software: Option<SoftwareCredentials>,
}

/// The `employer.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct EmployerFile {
    /// The tenant the employer profile belongs to.
    pub tenant_id: Uuid,
    /// The authority profile of the employer.
    pub employer: EmployerProfile,
}

/// The optional `employees.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeesFile {
    /// Employees to register for the tenant.
    #[serde(default)]
    pub employees: Vec<Employee>,
}

/// Everything needed to bootstrap one tenant.
#[derive(Debug, Clone)]
pub struct TenantSeed {
    /// The tenant identifier.
    pub tenant_id: Uuid,
    /// The employer's authority profile.
    pub employer: EmployerProfile,
    /// The tenant's payroll configuration.
    pub config: PayrollConfig,
    /// Seed employees (may be empty).
    pub employees: Vec<Employee>,
}
