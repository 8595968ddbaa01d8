//! Employer contributions (aportes patronales).
//!
//! All rates apply to the IBC:
//!
//! | Concept                    | Rate            |
//! |----------------------------|-----------------|
//! | Health (EPS)               | 8.5%            |
//! | Pension                    | 12%             |
//! | Occupational risk (ARL)    | 0.522% – 6.96%  |
//! | Compensation fund (CCF)    | 4%              |
//! | Training (SENA)            | 2%              |
//! | Child welfare (ICBF)       | 3%              |

use rust_decimal::Decimal;

use crate::models::{AuditStep, EmployerContributions, RiskLevel};

use super::proration::apply_rate;

/// Employer health contribution rate.
pub const EMPLOYER_HEALTH_RATE: Decimal = Decimal::from_parts(85, 0, 0, false, 3);
/// Employer pension contribution rate.
pub const EMPLOYER_PENSION_RATE: Decimal = Decimal::from_parts(12, 0, 0, false, 2);
/// Family compensation fund rate.
pub const COMPENSATION_FUND_RATE: Decimal = Decimal::from_parts(4, 0, 0, false, 2);
/// SENA rate.
pub const TRAINING_FUND_RATE: Decimal = Decimal::from_parts(2, 0, 0, false, 2);
/// ICBF rate.
pub const CHILD_WELFARE_RATE: Decimal = Decimal::from_parts(3, 0, 0, false, 2);

/// ARL rate for a risk level (Decreto 1772 de 1994).
///
/// ```
/// use nomina_engine::calculation::occupational_risk_rate;
/// use nomina_engine::models::RiskLevel;
/// use std::str::FromStr;
/// use rust_decimal::Decimal;
///
/// assert_eq!(occupational_risk_rate(RiskLevel::Level1), Decimal::from_str("0.00522").unwrap());
/// assert_eq!(occupational_risk_rate(RiskLevel::Level5), Decimal::from_str("0.0696").unwrap());
/// ```
pub fn occupational_risk_rate(level: RiskLevel) -> Decimal {
    match level {
        RiskLevel::Level1 => Decimal::from_parts(522, 0, 0, false, 5),
        RiskLevel::Level2 => Decimal::from_parts(1044, 0, 0, false, 5),
        RiskLevel::Level3 => Decimal::from_parts(2436, 0, 0, false, 5),
        RiskLevel::Level4 => Decimal::from_parts(435, 0, 0, false, 4),
        RiskLevel::Level5 => Decimal::from_parts(696, 0, 0, false, 4),
    }
}

/// The result of computing employer contributions.
#[derive(Debug, Clone)]
pub struct EmployerContributionsResult {
    /// The six contribution lines and their total.
    pub contributions: EmployerContributions,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the six employer contributions on the IBC.
pub fn calculate_employer_contributions(
    ibc: Decimal,
    risk_level: RiskLevel,
    step_number: u32,
) -> EmployerContributionsResult {
    let arl_rate = occupational_risk_rate(risk_level);

    let health = apply_rate(ibc, EMPLOYER_HEALTH_RATE);
    let pension = apply_rate(ibc, EMPLOYER_PENSION_RATE);
    let occupational_risk = apply_rate(ibc, arl_rate);
    let compensation_fund = apply_rate(ibc, COMPENSATION_FUND_RATE);
    let training_fund = apply_rate(ibc, TRAINING_FUND_RATE);
    let child_welfare = apply_rate(ibc, CHILD_WELFARE_RATE);
    let total =
        health + pension + occupational_risk + compensation_fund + training_fund + child_welfare;

    let contributions = EmployerContributions {
        health,
        pension,
        occupational_risk,
        compensation_fund,
        training_fund,
        child_welfare,
        total,
    };

    EmployerContributionsResult {
        audit_step: AuditStep {
            step_number,
            rule_id: "employer_contributions".to_string(),
            rule_name: "Employer Contributions".to_string(),
            legal_ref: "Ley 100 de 1993; Ley 21 de 1982; Ley 1607 de 2012".to_string(),
            input: serde_json::json!({
                "ibc": ibc.to_string(),
                "risk_level": risk_level.tier(),
                "arl_rate": arl_rate.to_string()
            }),
            output: serde_json::to_value(&contributions).unwrap_or_default(),
            reasoning: format!(
                "On IBC ${}: health ${}, pension ${}, ARL level {} ${}, CCF ${}, SENA ${}, ICBF ${}; total ${}",
                ibc,
                health,
                pension,
                risk_level.tier(),
                occupational_risk,
                compensation_fund,
                training_fund,
                child_welfare,
                total
            ),
        },
        contributions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_minimum_wage_contributions() {
        let result = calculate_employer_contributions(dec("1423500"), RiskLevel::Level1, 1);
        let c = &result.contributions;
        assert_eq!(c.health, dec("120998"));
        assert_eq!(c.pension, dec("170820"));
        assert_eq!(c.occupational_risk, dec("7431"));
        assert_eq!(c.compensation_fund, dec("56940"));
        assert_eq!(c.training_fund, dec("28470"));
        assert_eq!(c.child_welfare, dec("42705"));
        assert_eq!(c.total, dec("427364"));
    }

    #[test]
    fn test_risk_level_changes_only_arl() {
        let low = calculate_employer_contributions(dec("2000000"), RiskLevel::Level1, 1);
        let high = calculate_employer_contributions(dec("2000000"), RiskLevel::Level5, 1);
        assert_eq!(low.contributions.occupational_risk, dec("10440"));
        assert_eq!(high.contributions.occupational_risk, dec("139200"));
        assert_eq!(low.contributions.health, high.contributions.health);
    }

    #[test]
    fn test_zero_ibc_is_zero() {
        let result = calculate_employer_contributions(Decimal::ZERO, RiskLevel::Level3, 1);
        assert_eq!(result.contributions.total, Decimal::ZERO);
    }
}
