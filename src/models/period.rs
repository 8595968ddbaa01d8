//! Payroll period model and its lifecycle.
//!
//! A [`PayrollPeriod`] is the unit a tenant calculates, approves and closes.
//! Its status only ever moves forward:
//!
//! ```text
//! OPEN → CALCULATED → APPROVED → (SENT_TO_DIAN) → CLOSED
//!   ↑________|  (recalculation stays in CALCULATED)
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of days a single period is paid for.
pub const MAX_PERIOD_DAYS: u32 = 30;

/// How often the period recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    /// Weekly payroll.
    Weekly,
    /// Twice a month (quincenal).
    SemiMonthly,
    /// Once a month.
    Monthly,
}

impl PeriodType {
    /// The authority's payroll-period code.
    pub fn code(self) -> &'static str {
        match self {
            PeriodType::Weekly => "1",
            PeriodType::SemiMonthly => "4",
            PeriodType::Monthly => "5",
        }
    }
}

/// Lifecycle status of a payroll period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodStatus {
    /// Created, not yet calculated.
    Open,
    /// Entries calculated; may be recalculated.
    Calculated,
    /// Approved; entries are frozen.
    Approved,
    /// Documents delivered to the tax authority.
    SentToDian,
    /// Closed for good.
    Closed,
}

impl PeriodStatus {
    /// Returns true if moving from `self` to `next` is a legal transition.
    ///
    /// ```
    /// use nomina_engine::models::PeriodStatus;
    ///
    /// assert!(PeriodStatus::Open.can_transition_to(PeriodStatus::Calculated));
    /// assert!(PeriodStatus::Calculated.can_transition_to(PeriodStatus::Calculated));
    /// assert!(!PeriodStatus::Approved.can_transition_to(PeriodStatus::Calculated));
    /// assert!(!PeriodStatus::Open.can_transition_to(PeriodStatus::Closed));
    /// ```
    pub fn can_transition_to(self, next: PeriodStatus) -> bool {
        use PeriodStatus::*;
        matches!(
            (self, next),
            (Open, Calculated)
                | (Calculated, Calculated)
                | (Calculated, Approved)
                | (Approved, SentToDian)
                | (Approved, Closed)
                | (SentToDian, Closed)
        )
    }
}

/// Aggregated money totals across a period's entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotals {
    /// Sum of all devengados.
    pub total_earned: Decimal,
    /// Sum of all deducciones.
    pub total_deductions: Decimal,
    /// Sum of all net pay.
    pub total_net: Decimal,
    /// Sum of employer contributions (aportes).
    pub total_employer_contributions: Decimal,
    /// Sum of provisions.
    pub total_provisions: Decimal,
}

/// A payroll period of one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollPeriod {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Display name (e.g. "Enero 2026").
    pub name: String,
    /// Recurrence of the period.
    pub period_type: PeriodType,
    /// First day (inclusive).
    pub start_date: NaiveDate,
    /// Last day (inclusive).
    pub end_date: NaiveDate,
    /// Date employees are paid.
    pub payment_date: NaiveDate,
    /// Lifecycle status.
    pub status: PeriodStatus,
    /// Aggregated totals across entries.
    pub totals: PeriodTotals,
    /// Number of entries processed by the last calculation.
    pub employee_count: u32,
    /// Who approved the period.
    pub approved_by: Option<String>,
    /// When the period was approved.
    pub approved_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl PayrollPeriod {
    /// Returns true if `[start, end]` shares at least one day with this period.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.end_date && self.start_date <= end
    }

    /// Days paid for this period.
    pub fn period_days(&self) -> u32 {
        calculate_period_days(self.start_date, self.end_date)
    }
}

/// Counts the inclusive calendar days of a period, capped at 30.
///
/// Periods declared longer than a month are silently truncated to 30 days;
/// multi-month periods are not rejected at creation.
///
/// ```
/// use nomina_engine::models::calculate_period_days;
/// use chrono::NaiveDate;
///
/// let d = |m, d| NaiveDate::from_ymd_opt(2026, m, d).unwrap();
/// assert_eq!(calculate_period_days(d(1, 1), d(1, 15)), 15);
/// assert_eq!(calculate_period_days(d(1, 1), d(1, 31)), 30);
/// assert_eq!(calculate_period_days(d(2, 1), d(2, 28)), 28);
/// ```
pub fn calculate_period_days(start: NaiveDate, end: NaiveDate) -> u32 {
    let days = (end - start).num_days() + 1;
    if days <= 0 {
        return 0;
    }
    let days = u32::try_from(days).unwrap_or(u32::MAX);
    if days > MAX_PERIOD_DAYS {
        if days > 31 {
            tracing::warn!(
                start = %start,
                end = %end,
                days,
                "Period longer than one month truncated to 30 days"
            );
        }
        return MAX_PERIOD_DAYS;
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_period() -> PayrollPeriod {
        PayrollPeriod {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            name: "Enero 2026".to_string(),
            period_type: PeriodType::Monthly,
            start_date: date(2026, 1, 1),
            end_date: date(2026, 1, 31),
            payment_date: date(2026, 1, 31),
            status: PeriodStatus::Open,
            totals: PeriodTotals::default(),
            employee_count: 0,
            approved_by: None,
            approved_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_overlap_detection() {
        let period = create_period();
        assert!(period.overlaps(date(2026, 1, 31), date(2026, 2, 15)));
        assert!(period.overlaps(date(2025, 12, 15), date(2026, 1, 1)));
        assert!(period.overlaps(date(2026, 1, 10), date(2026, 1, 20)));
        assert!(!period.overlaps(date(2026, 2, 1), date(2026, 2, 28)));
        assert!(!period.overlaps(date(2025, 12, 1), date(2025, 12, 31)));
    }

    #[test]
    fn test_period_days_capped_for_31_day_month() {
        assert_eq!(create_period().period_days(), 30);
    }

    #[test]
    fn test_period_days_multi_month_truncated() {
        assert_eq!(calculate_period_days(date(2026, 1, 1), date(2026, 3, 31)), 30);
    }

    #[test]
    fn test_period_days_inverted_range_is_zero() {
        assert_eq!(calculate_period_days(date(2026, 1, 10), date(2026, 1, 1)), 0);
    }

    #[test]
    fn test_transitions_are_monotonic() {
        use PeriodStatus::*;
        assert!(Approved.can_transition_to(SentToDian));
        assert!(SentToDian.can_transition_to(Closed));
        assert!(!Closed.can_transition_to(Open));
        assert!(!SentToDian.can_transition_to(Approved));
        assert!(!Open.can_transition_to(Approved));
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&PeriodStatus::SentToDian).unwrap(),
            "\"SENT_TO_DIAN\""
        );
        assert_eq!(PeriodType::SemiMonthly.code(), "4");
    }
}
