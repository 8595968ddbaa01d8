//! CUNE: the unique electronic payroll document code.
//!
//! SHA-384 over the plain concatenation of eleven fields, lowercase hex.
//! The tax authority recomputes it independently, so field order and the
//! exact string rendering of every field are part of the contract.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use sha2::{Digest, Sha384};

use crate::config::Environment;
use crate::models::DocumentType;

/// Length of a CUNE in hex characters.
pub const CUNE_LENGTH: usize = 96;

/// The fields hashed into a CUNE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CuneInput {
    /// Document number, e.g. `NOM-000001`.
    pub document_number: String,
    /// Generation timestamp in UTC-5.
    pub generated_at: DateTime<FixedOffset>,
    /// Total earned.
    pub total_earned: Decimal,
    /// Total deductions.
    pub total_deductions: Decimal,
    /// Net total.
    pub total_net: Decimal,
    /// Employer NIT without check digit.
    pub employer_nit: String,
    /// Employee identification number.
    pub employee_document: String,
    /// Target environment.
    pub environment: Environment,
    /// Software PIN.
    pub software_pin: String,
    /// Document type (102 or 103).
    pub document_type: DocumentType,
}

impl CuneInput {
    /// The exact string that is hashed.
    pub fn canonical_string(&self) -> String {
        format!(
            "{}{}{}{}{}{}{}{}{}{}{}",
            self.document_number,
            self.generated_at.format("%Y-%m-%d"),
            self.generated_at.format("%H:%M:%S%:z"),
            format_amount(self.total_earned),
            format_amount(self.total_deductions),
            format_amount(self.total_net),
            self.employer_nit,
            self.employee_document,
            self.environment.code(),
            self.software_pin,
            self.document_type.code(),
        )
    }
}

/// Renders a monetary value with exactly two decimals.
///
/// ```
/// use nomina_engine::dian::format_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_amount(Decimal::from(1623500)), "1623500.00");
/// assert_eq!(format_amount(Decimal::new(15, 1)), "1.50");
/// ```
pub fn format_amount(value: Decimal) -> String {
    format!("{:.2}", value)
}

/// Generates the CUNE for a document.
pub fn generate_cune(input: &CuneInput) -> String {
    let digest = Sha384::digest(input.canonical_string().as_bytes());
    hex::encode(digest)
}
