//! Overtime pay calculation.
//!
//! ## Rate Structure
//!
//! The hourly rate is the monthly salary divided by 240 hours. Each overtime
//! hour is paid at the hourly rate times `1 + surcharge`:
//!
//! | Type                           | Code  | Surcharge |
//! |--------------------------------|-------|-----------|
//! | Daytime                        | HED   | +25%      |
//! | Night                          | HEN   | +75%      |
//! | Sunday/holiday daytime         | HEDDF | +100%     |
//! | Sunday/holiday night           | HENDF | +150%     |
//! | Sunday/holiday daytime special | HRDDF | +150%     |
//! | Sunday/holiday night special   | HRNDF | +175%     |
//!
//! Integral-salary employees never receive overtime pay.

use rust_decimal::Decimal;

use crate::models::{AuditStep, OvertimeDetail, OvertimeLine, SalaryType};

use super::proration::round_currency;

/// Monthly ordinary hours used to derive the hourly rate.
pub const MONTHLY_HOURS: u32 = 240;

/// The result of pricing all overtime details.
#[derive(Debug, Clone)]
pub struct OvertimeResult {
    /// One priced line per overtime detail (empty for integral salary).
    pub lines: Vec<OvertimeLine>,
    /// Sum of the line amounts.
    pub total: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Prices each overtime detail individually.
///
/// # Examples
///
/// ```
/// use nomina_engine::calculation::calculate_overtime;
/// use nomina_engine::models::{OvertimeDetail, OvertimeType, SalaryType};
/// use rust_decimal::Decimal;
///
/// // 2,400,000 / 240 = 10,000 per hour; 2h × 1.25 = 25,000
/// let result = calculate_overtime(
///     Decimal::from(2_400_000),
///     SalaryType::Ordinary,
///     &[OvertimeDetail { overtime_type: OvertimeType::Day, hours: Decimal::from(2) }],
///     1,
/// );
/// assert_eq!(result.total, Decimal::from(25_000));
/// ```
pub fn calculate_overtime(
    base_salary: Decimal,
    salary_type: SalaryType,
    details: &[OvertimeDetail],
    step_number: u32,
) -> OvertimeResult {
    let hourly_rate = base_salary / Decimal::from(MONTHLY_HOURS);
    let requested_hours: Decimal = details.iter().map(|d| d.hours).sum();

    if salary_type == SalaryType::Integral {
        return OvertimeResult {
            lines: Vec::new(),
            total: Decimal::ZERO,
            audit_step: AuditStep {
                step_number,
                rule_id: "overtime".to_string(),
                rule_name: "Overtime".to_string(),
                legal_ref: "CST art. 132, 168".to_string(),
                input: serde_json::json!({
                    "salary_type": "integral",
                    "requested_hours": requested_hours.to_string()
                }),
                output: serde_json::json!({ "overtime_total": "0" }),
                reasoning: "Integral salary already compensates overtime; no overtime paid"
                    .to_string(),
            },
        };
    }

    let lines: Vec<OvertimeLine> = details
        .iter()
        .filter(|d| d.hours > Decimal::ZERO)
        .map(|d| {
            let multiplier = d.overtime_type.multiplier();
            OvertimeLine {
                overtime_type: d.overtime_type,
                hours: d.hours,
                multiplier,
                amount: round_currency(hourly_rate * multiplier * d.hours),
            }
        })
        .collect();

    let total: Decimal = lines.iter().map(|l| l.amount).sum();

    let breakdown: Vec<serde_json::Value> = lines
        .iter()
        .map(|l| {
            serde_json::json!({
                "code": l.overtime_type.code(),
                "hours": l.hours.normalize().to_string(),
                "multiplier": l.multiplier.normalize().to_string(),
                "amount": l.amount.to_string()
            })
        })
        .collect();

    let reasoning = if lines.is_empty() {
        "No overtime reported".to_string()
    } else {
        lines
            .iter()
            .map(|l| {
                format!(
                    "{} {}h × ${} × {} = ${}",
                    l.overtime_type.code(),
                    l.hours.normalize(),
                    round_currency(hourly_rate),
                    l.multiplier.normalize(),
                    l.amount
                )
            })
            .collect::<Vec<_>>()
            .join("; ")
    };

    OvertimeResult {
        lines,
        total,
        audit_step: AuditStep {
            step_number,
            rule_id: "overtime".to_string(),
            rule_name: "Overtime".to_string(),
            legal_ref: "CST art. 168, 179".to_string(),
            input: serde_json::json!({
                "base_salary": base_salary.to_string(),
                "monthly_hours": MONTHLY_HOURS,
                "requested_hours": requested_hours.normalize().to_string()
            }),
            output: serde_json::json!({
                "lines": breakdown,
                "overtime_total": total.to_string()
            }),
            reasoning,
        },
    }
}
