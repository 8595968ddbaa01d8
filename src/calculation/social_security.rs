//! Employee social-security deductions.
//!
//! - Health: 4% of IBC.
//! - Pension: 4% of IBC.
//! - Solidarity pension fund: only when IBC exceeds 4× SMMLV. The base
//!   rate is 1%; above 16, 17, 18, 19 and 20× SMMLV an extra 0.2% to 1.0%
//!   applies. Only the band the IBC falls into counts.

use rust_decimal::Decimal;

use crate::models::AuditStep;

use super::proration::apply_rate;

/// Employee health contribution rate.
pub const EMPLOYEE_HEALTH_RATE: Decimal = Decimal::from_parts(4, 0, 0, false, 2);

/// Employee pension contribution rate.
pub const EMPLOYEE_PENSION_RATE: Decimal = Decimal::from_parts(4, 0, 0, false, 2);

/// IBC threshold (in SMMLV) above which the solidarity fund applies.
pub const SOLIDARITY_THRESHOLD_MULTIPLE: u32 = 4;

/// Base solidarity fund rate.
pub const SOLIDARITY_BASE_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Additional solidarity rates by SMMLV multiple, highest band first.
const SOLIDARITY_BANDS: [(u32, Decimal); 5] = [
    (20, Decimal::from_parts(10, 0, 0, false, 3)),
    (19, Decimal::from_parts(8, 0, 0, false, 3)),
    (18, Decimal::from_parts(6, 0, 0, false, 3)),
    (17, Decimal::from_parts(4, 0, 0, false, 3)),
    (16, Decimal::from_parts(2, 0, 0, false, 3)),
];

/// The employee health and pension deductions.
#[derive(Debug, Clone)]
pub struct SocialSecurityResult {
    /// Health deduction.
    pub health: Decimal,
    /// Pension deduction.
    pub pension: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// The solidarity pension fund surcharge.
#[derive(Debug, Clone)]
pub struct SolidarityFundResult {
    /// Rate applied (zero when below the threshold).
    pub rate: Decimal,
    /// Amount deducted.
    pub amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the employee health and pension deductions.
///
/// ```
/// use nomina_engine::calculation::calculate_social_security;
/// use rust_decimal::Decimal;
///
/// let result = calculate_social_security(Decimal::from(1_423_500), 1);
/// assert_eq!(result.health, Decimal::from(56_940));
/// assert_eq!(result.pension, Decimal::from(56_940));
/// ```
pub fn calculate_social_security(ibc: Decimal, step_number: u32) -> SocialSecurityResult {
    let health = apply_rate(ibc, EMPLOYEE_HEALTH_RATE);
    let pension = apply_rate(ibc, EMPLOYEE_PENSION_RATE);

    SocialSecurityResult {
        health,
        pension,
        audit_step: AuditStep {
            step_number,
            rule_id: "social_security".to_string(),
            rule_name: "Employee Health and Pension".to_string(),
            legal_ref: "Ley 100 de 1993 art. 20, 204".to_string(),
            input: serde_json::json!({
                "ibc": ibc.to_string(),
                "health_rate": EMPLOYEE_HEALTH_RATE.to_string(),
                "pension_rate": EMPLOYEE_PENSION_RATE.to_string()
            }),
            output: serde_json::json!({
                "health": health.to_string(),
                "pension": pension.to_string()
            }),
            reasoning: format!(
                "Health 4% × ${} = ${}; pension 4% × ${} = ${}",
                ibc, health, ibc, pension
            ),
        },
    }
}

/// Returns the solidarity fund rate for an IBC, or zero below the threshold.
///
/// ```
/// use nomina_engine::calculation::solidarity_rate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let smmlv = Decimal::from(1_423_500);
/// assert_eq!(solidarity_rate(Decimal::from(5_000_000), smmlv), Decimal::ZERO);
/// assert_eq!(solidarity_rate(Decimal::from(10_000_000), smmlv), Decimal::from_str("0.01").unwrap());
/// ```
pub fn solidarity_rate(ibc: Decimal, minimum_wage: Decimal) -> Decimal {
    if ibc <= minimum_wage * Decimal::from(SOLIDARITY_THRESHOLD_MULTIPLE) {
        return Decimal::ZERO;
    }
    let extra = SOLIDARITY_BANDS
        .iter()
        .find(|(multiple, _)| ibc > minimum_wage * Decimal::from(*multiple))
        .map(|(_, rate)| *rate)
        .unwrap_or(Decimal::ZERO);
    SOLIDARITY_BASE_RATE + extra
}

/// Calculates the solidarity pension fund surcharge.
pub fn calculate_solidarity_fund(
    ibc: Decimal,
    minimum_wage: Decimal,
    step_number: u32,
) -> SolidarityFundResult {
    let rate = solidarity_rate(ibc, minimum_wage);
    let amount = apply_rate(ibc, rate);
    let multiple = if minimum_wage > Decimal::ZERO {
        (ibc / minimum_wage).round_dp(2)
    } else {
        Decimal::ZERO
    };

    let reasoning = if rate.is_zero() {
        format!(
            "IBC ${} is {}× SMMLV, not above {}×; no solidarity fund",
            ibc, multiple, SOLIDARITY_THRESHOLD_MULTIPLE
        )
    } else {
        format!(
            "IBC ${} is {}× SMMLV: {}% × ${} = ${}",
            ibc,
            multiple,
            (rate * Decimal::ONE_HUNDRED).normalize(),
            ibc,
            amount
        )
    };

    SolidarityFundResult {
        rate,
        amount,
        audit_step: AuditStep {
            step_number,
            rule_id: "solidarity_fund".to_string(),
            rule_name: "Solidarity Pension Fund".to_string(),
            legal_ref: "Ley 797 de 2003 art. 8".to_string(),
            input: serde_json::json!({
                "ibc": ibc.to_string(),
                "minimum_wage": minimum_wage.to_string(),
                "smmlv_multiple": multiple.to_string()
            }),
            output: serde_json::json!({
                "rate": rate.normalize().to_string(),
                "solidarity_fund": amount.to_string()
            }),
            reasoning,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    const SMMLV: &str = "1423500";

    #[test]
    fn test_health_and_pension_are_four_percent() {
        let result = calculate_social_security(dec("2500000"), 1);
        assert_eq!(result.health, dec("100000"));
        assert_eq!(result.pension, dec("100000"));
    }

    #[test]
    fn test_no_solidarity_at_exactly_four_times() {
        let ibc = dec(SMMLV) * dec("4");
        assert_eq!(solidarity_rate(ibc, dec(SMMLV)), Decimal::ZERO);
        let result = calculate_solidarity_fund(ibc, dec(SMMLV), 1);
        assert_eq!(result.amount, Decimal::ZERO);
    }

    #[test]
    fn test_base_solidarity_rate_above_four_times() {
        let result = calculate_solidarity_fund(dec("10000000"), dec(SMMLV), 1);
        assert_eq!(result.rate, dec("0.01"));
        assert_eq!(result.amount, dec("100000"));
    }

    #[test]
    fn test_band_rates_are_not_cumulative() {
        // 25,000,000 / 1,423,500 = 17.56×, falls in the 17× band
        let result = calculate_solidarity_fund(dec("25000000"), dec(SMMLV), 1);
        assert_eq!(result.rate, dec("0.014"));
        assert_eq!(result.amount, dec("350000"));
    }

    #[test]
    fn test_band_boundaries_are_strict() {
        let smmlv = dec(SMMLV);
        assert_eq!(solidarity_rate(smmlv * dec("16"), smmlv), dec("0.01"));
        assert_eq!(solidarity_rate(smmlv * dec("16") + dec("1"), smmlv), dec("0.012"));
        assert_eq!(solidarity_rate(smmlv * dec("19.5"), smmlv), dec("0.018"));
        assert_eq!(solidarity_rate(smmlv * dec("30"), smmlv), dec("0.02"));
    }
}
