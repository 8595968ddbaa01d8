//! Income-tax withholding (retención en la fuente, procedimiento 1).
//!
//! The taxable base is total earned minus the transport allowance and the
//! mandatory employee contributions. A flat 25% exempt labor income is
//! removed, the remainder is expressed in UVT and run through the
//! marginal bracket table of Estatuto Tributario art. 383.

use rust_decimal::Decimal;

use crate::models::AuditStep;

use super::proration::{apply_rate, non_negative, round_currency};

/// Exempt share of labor income.
pub const EXEMPT_INCOME_RATE: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

/// One row of the withholding table, expressed in UVT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithholdingBracket {
    /// Lower bound (exclusive) in UVT.
    pub lower_uvt: Decimal,
    /// Marginal rate applied above the lower bound.
    pub rate: Decimal,
    /// Accumulated tax from lower brackets, in UVT.
    pub base_tax_uvt: Decimal,
}

const fn bracket(lower_uvt: u32, rate_pct: u32, base_tax_uvt: u32) -> WithholdingBracket {
    WithholdingBracket {
        lower_uvt: Decimal::from_parts(lower_uvt, 0, 0, false, 0),
        rate: Decimal::from_parts(rate_pct, 0, 0, false, 2),
        base_tax_uvt: Decimal::from_parts(base_tax_uvt, 0, 0, false, 0),
    }
}

/// The seven brackets of the monthly withholding table.
pub const WITHHOLDING_BRACKETS: [WithholdingBracket; 7] = [
    bracket(0, 0, 0),
    bracket(95, 19, 0),
    bracket(150, 28, 10),
    bracket(360, 33, 69),
    bracket(640, 35, 162),
    bracket(945, 37, 268),
    bracket(2300, 39, 770),
];

/// The result of computing withholding.
#[derive(Debug, Clone)]
pub struct WithholdingResult {
    /// Taxable base before the exemption.
    pub taxable_base: Decimal,
    /// Exempt amount removed.
    pub exempt_amount: Decimal,
    /// Taxable base after the exemption, in UVT.
    pub base_uvt: Decimal,
    /// Withholding in whole pesos.
    pub amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Finds the bracket a base (in UVT) falls into.
pub fn find_bracket(base_uvt: Decimal) -> &'static WithholdingBracket {
    WITHHOLDING_BRACKETS
        .iter()
        .rev()
        .find(|b| base_uvt > b.lower_uvt)
        .unwrap_or(&WITHHOLDING_BRACKETS[0])
}

/// Calculates the monthly income-tax withholding.
///
/// # Examples
///
/// ```
/// use nomina_engine::calculation::calculate_withholding;
/// use rust_decimal::Decimal;
///
/// // Minimum-wage earners never reach the first taxed bracket.
/// let result = calculate_withholding(
///     Decimal::from(1_623_500),
///     Decimal::from(200_000),
///     Decimal::from(113_880),
///     Decimal::from(49_799),
///     1,
/// );
/// assert_eq!(result.amount, Decimal::ZERO);
/// ```
pub fn calculate_withholding(
    total_earned: Decimal,
    transport_allowance: Decimal,
    mandatory_contributions: Decimal,
    uvt_value: Decimal,
    step_number: u32,
) -> WithholdingResult {
    let taxable_base = non_negative(total_earned - transport_allowance - mandatory_contributions);
    let exempt_amount = apply_rate(taxable_base, EXEMPT_INCOME_RATE);
    let net_base = taxable_base - exempt_amount;

    let base_uvt = if uvt_value > Decimal::ZERO {
        net_base / uvt_value
    } else {
        Decimal::ZERO
    };

    let bracket = find_bracket(base_uvt);
    let amount = if bracket.rate.is_zero() {
        Decimal::ZERO
    } else {
        let tax_uvt = (base_uvt - bracket.lower_uvt) * bracket.rate + bracket.base_tax_uvt;
        round_currency(tax_uvt * uvt_value)
    };

    let reasoning = if amount.is_zero() {
        format!(
            "Taxable ${} less 25% exempt = ${} ({} UVT); below {} UVT, no withholding",
            taxable_base,
            net_base,
            base_uvt.round_dp(2),
            WITHHOLDING_BRACKETS[1].lower_uvt
        )
    } else {
        format!(
            "Taxable ${} less 25% exempt = ${} ({} UVT); ({} − {}) × {}% + {} UVT = ${}",
            taxable_base,
            net_base,
            base_uvt.round_dp(2),
            base_uvt.round_dp(2),
            bracket.lower_uvt,
            (bracket.rate * Decimal::ONE_HUNDRED).normalize(),
            bracket.base_tax_uvt,
            amount
        )
    };

    WithholdingResult {
        taxable_base,
        exempt_amount,
        base_uvt,
        amount,
        audit_step: AuditStep {
            step_number,
            rule_id: "withholding".to_string(),
            rule_name: "Income Tax Withholding".to_string(),
            legal_ref: "Estatuto Tributario art. 206 num. 10, 383".to_string(),
            input: serde_json::json!({
                "total_earned": total_earned.to_string(),
                "transport_allowance": transport_allowance.to_string(),
                "mandatory_contributions": mandatory_contributions.to_string(),
                "uvt_value": uvt_value.to_string()
            }),
            output: serde_json::json!({
                "taxable_base": taxable_base.to_string(),
                "exempt_amount": exempt_amount.to_string(),
                "base_uvt": base_uvt.round_dp(4).to_string(),
                "withholding": amount.to_string()
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

    const UVT: &str = "49799";

    #[test]
    fn test_first_taxed_bracket() {
        // 10,000,000 − 900,000 contributions = 9,100,000; 75% = 6,825,000
        // 137.05 UVT → (137.05 − 95) × 19% = 7.99 UVT = 397,878
        let result = calculate_withholding(
            dec("10000000"),
            Decimal::ZERO,
            dec("900000"),
            dec(UVT),
            1,
        );
        assert_eq!(result.taxable_base, dec("9100000"));
        assert_eq!(result.exempt_amount, dec("2275000"));
        assert_eq!(result.amount, dec("397878"));
    }

    #[test]
    fn test_zero_bracket_yields_zero() {
        let result = calculate_withholding(
            dec("5000000"),
            Decimal::ZERO,
            dec("400000"),
            dec(UVT),
            1,
        );
        // 4,600,000 × 75% = 3,450,000 = 69.3 UVT
        assert_eq!(result.amount, Decimal::ZERO);
        assert!(result.audit_step.reasoning.contains("no withholding"));
    }

    #[test]
    fn test_find_bracket_boundaries() {
        assert_eq!(find_bracket(dec("95")).rate, Decimal::ZERO);
        assert_eq!(find_bracket(dec("95.01")).rate, dec("0.19"));
        assert_eq!(find_bracket(dec("640")).rate, dec("0.33"));
        assert_eq!(find_bracket(dec("5000")).rate, dec("0.39"));
        assert_eq!(find_bracket(dec("5000")).base_tax_uvt, dec("770"));
    }

    #[test]
    fn test_upper_bracket_includes_accumulated_tax() {
        // UVT 48,000: 25,600,000 × 75% = 19,200,000 = 400 UVT
        // (400 − 360) × 33% + 69 = 82.2 UVT = 3,945,600
        let result = calculate_withholding(
            dec("25600000"),
            Decimal::ZERO,
            Decimal::ZERO,
            dec("48000"),
            1,
        );
        assert_eq!(result.base_uvt, dec("400"));
        assert_eq!(result.amount, dec("3945600"));
    }

    #[test]
    fn test_negative_base_saturates() {
        let result = calculate_withholding(
            dec("100000"),
            dec("200000"),
            dec("0"),
            dec(UVT),
            1,
        );
        assert_eq!(result.taxable_base, Decimal::ZERO);
        assert_eq!(result.amount, Decimal::ZERO);
    }
}
