//! Read models for statutory benefit payments and termination liquidation.
//!
//! These are computed on demand and never persisted.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Provisions;

/// The four statutory employee benefits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BenefitType {
    /// Prima de servicios (semiannual).
    ServiceBonus,
    /// Cesantías (annual).
    Severance,
    /// Intereses sobre cesantías (annual, 12%).
    SeveranceInterest,
    /// Vacaciones (accrues over the whole tenure).
    Vacation,
}

impl BenefitType {
    /// All benefit types in liquidation order.
    pub const ALL: [BenefitType; 4] = [
        BenefitType::ServiceBonus,
        BenefitType::Severance,
        BenefitType::SeveranceInterest,
        BenefitType::Vacation,
    ];

    /// Human-readable Spanish label used in audit formulas.
    pub fn label(self) -> &'static str {
        match self {
            BenefitType::ServiceBonus => "Prima de servicios",
            BenefitType::Severance => "Cesantías",
            BenefitType::SeveranceInterest => "Intereses sobre cesantías",
            BenefitType::Vacation => "Vacaciones",
        }
    }
}

/// The result of computing one benefit disbursement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitPaymentResult {
    /// The employee the benefit is for.
    pub employee_id: Uuid,
    /// The benefit computed.
    pub benefit_type: BenefitType,
    /// The requested payment date.
    pub payment_date: NaiveDate,
    /// First day of the accrual window.
    pub period_start: NaiveDate,
    /// Last day of the accrual window.
    pub period_end: NaiveDate,
    /// Days in the window under the 360-day convention.
    pub days: u32,
    /// Monthly base salary used.
    pub base_salary: Decimal,
    /// Monthly transport allowance included in the base (zero if not entitled).
    pub transport_allowance: Decimal,
    /// Amount payable, in whole pesos.
    pub amount: Decimal,
    /// The formula with the actual figures substituted.
    pub formula: String,
}

/// One line of a liquidation preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidationItem {
    /// The benefit.
    pub benefit_type: BenefitType,
    /// First day of the window since the last reset.
    pub period_start: NaiveDate,
    /// Termination date.
    pub period_end: NaiveDate,
    /// Days in the window under the 360-day convention.
    pub days: u32,
    /// Amount accrued, in whole pesos.
    pub amount: Decimal,
    /// The formula with the actual figures substituted.
    pub formula: String,
}

/// A termination liquidation preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidationPreview {
    /// The employee.
    pub employee_id: Uuid,
    /// Hire date.
    pub hire_date: NaiveDate,
    /// Termination date used for the preview.
    pub termination_date: NaiveDate,
    /// Monthly base salary.
    pub base_salary: Decimal,
    /// Monthly transport allowance (zero if not entitled).
    pub transport_allowance: Decimal,
    /// Benefit lines.
    pub items: Vec<LiquidationItem>,
    /// Sum of the benefit lines.
    pub total_benefits: Decimal,
    /// Provisions already posted on approved/closed entries.
    pub provisions_posted: Provisions,
    /// Sum of the posted provisions.
    pub total_provisions_posted: Decimal,
    /// `total_benefits - total_provisions_posted`.
    pub net_payable: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_benefit_type_serialization() {
        assert_eq!(
            serde_json::to_string(&BenefitType::SeveranceInterest).unwrap(),
            "\"SEVERANCE_INTEREST\""
        );
        let parsed: BenefitType = serde_json::from_str("\"SERVICE_BONUS\"").unwrap();
        assert_eq!(parsed, BenefitType::ServiceBonus);
    }

    #[test]
    fn test_all_benefits_have_labels() {
        for benefit in BenefitType::ALL {
            assert!(!benefit.label().is_empty());
        }
    }
}
