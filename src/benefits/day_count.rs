//! 360-day convention and benefit accrual windows.
//!
//! Every month counts as 30 days and the day of month is capped at 30
//! before subtracting, so a full semester is 180 days and a full year 360
//! regardless of the calendar.

use chrono::{Datelike, NaiveDate};

use crate::models::BenefitType;

/// Days in a year under the 360-day convention.
pub const DAYS_PER_YEAR: u32 = 360;

/// Inclusive day count between two dates under the 360-day convention.
///
/// Returns 0 when `end` precedes `start`.
///
/// ```
/// use chrono::NaiveDate;
/// use nomina_engine::benefits::days360;
///
/// let d = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
/// assert_eq!(days360(d(2025, 1, 1), d(2025, 6, 30)), 180);
/// assert_eq!(days360(d(2025, 1, 1), d(2025, 12, 31)), 360);
/// assert_eq!(days360(d(2025, 3, 15), d(2025, 3, 14)), 0);
/// ```
pub fn days360(start: NaiveDate, end: NaiveDate) -> u32 {
    if end < start {
        return 0;
    }
    let years = i64::from(end.year() - start.year());
    let months = i64::from(end.month()) - i64::from(start.month());
    let days = i64::from(end.day().min(30)) - i64::from(start.day().min(30));
    let total = years * 360 + months * 30 + days + 1;
    u32::try_from(total.max(0)).unwrap_or(0)
}

/// A benefit accrual window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccrualWindow {
    /// First accrued day.
    pub start: NaiveDate,
    /// Last accrued day.
    pub end: NaiveDate,
    /// Days under the 360-day convention (zero for an empty window).
    pub days: u32,
}

impl AccrualWindow {
    fn clipped(
        window_start: NaiveDate,
        window_end: NaiveDate,
        hire_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Self {
        let start = window_start.max(hire_date);
        let end = match end_date {
            Some(left) => window_end.min(left),
            None => window_end,
        };
        Self {
            start,
            end,
            days: days360(start, end),
        }
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

/// First day of the semester containing `date`.
pub fn semester_start(date: NaiveDate) -> NaiveDate {
    if date.month() <= 6 {
        ymd(date.year(), 1, 1)
    } else {
        ymd(date.year(), 7, 1)
    }
}

/// First day of the calendar year containing `date`.
pub fn year_start(date: NaiveDate) -> NaiveDate {
    ymd(date.year(), 1, 1)
}

/// The accrual window of an on-demand benefit payment.
///
/// - Service bonus: the semester containing the payment date, up to it.
/// - Severance and its interest: paid in January or February, the whole
///   previous calendar year; otherwise the current year up to the payment
///   date.
/// - Vacation: from hire to the payment date, no reset.
///
/// Every window is clipped to the hire date and the employee's end date.
pub fn payment_window(
    benefit: BenefitType,
    hire_date: NaiveDate,
    end_date: Option<NaiveDate>,
    payment_date: NaiveDate,
) -> AccrualWindow {
    match benefit {
        BenefitType::ServiceBonus => AccrualWindow::clipped(
            semester_start(payment_date),
            payment_date,
            hire_date,
            end_date,
        ),
        BenefitType::Severance | BenefitType::SeveranceInterest => {
            if payment_date.month() <= 2 {
                let previous = payment_date.year() - 1;
                AccrualWindow::clipped(
                    ymd(previous, 1, 1),
                    ymd(previous, 12, 31),
                    hire_date,
                    end_date,
                )
            } else {
                AccrualWindow::clipped(
                    year_start(payment_date),
                    payment_date,
                    hire_date,
                    end_date,
                )
            }
        }
        BenefitType::Vacation => {
            AccrualWindow::clipped(hire_date, payment_date, hire_date, end_date)
        }
    }
}

/// The window accrued since the last reset, as of a termination date.
///
/// Current semester for the service bonus, current calendar year for
/// severance and interest, and the full tenure for vacation.
pub fn liquidation_window(
    benefit: BenefitType,
    hire_date: NaiveDate,
    termination_date: NaiveDate,
) -> AccrualWindow {
    let window_start = match benefit {
        BenefitType::ServiceBonus => semester_start(termination_date),
        BenefitType::Severance | BenefitType::SeveranceInterest => year_start(termination_date),
        BenefitType::Vacation => hire_date,
    };
    AccrualWindow::clipped(window_start, termination_date, hire_date, None)
}
