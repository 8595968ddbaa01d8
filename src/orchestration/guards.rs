//! Guard functions checked before each command.
//!
//! Each guard returns a typed `BadRequest` describing the rejected
//! precondition and logs the rejection at warn.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::warn;
use uuid::Uuid;

use crate::calculation::DAYS_PER_MONTH;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Employee, EntryInputs, EntryStatus, PayrollEntry, PayrollPeriod, PeriodStatus,
};

/// Upper bound on overtime hours of one kind: every hour of a 31-day month.
pub const MAX_OVERTIME_HOURS: u32 = 744;

/// Upper bound on any single monetary input, in pesos.
pub const MAX_INPUT_AMOUNT: i64 = 1_000_000_000_000;

fn reject(message: String) -> EngineError {
    warn!(reason = %message, "Command rejected");
    EngineError::bad_request(message)
}

/// The end date must be after the start date.
pub fn validate_period_range(start_date: NaiveDate, end_date: NaiveDate) -> EngineResult<()> {
    if end_date <= start_date {
        return Err(reject(format!(
            "End date {} must be after start date {}",
            end_date, start_date
        )));
    }
    Ok(())
}

/// No existing period of the tenant may share a day with `[start, end]`.
pub fn ensure_no_overlap(
    existing: &[PayrollPeriod],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> EngineResult<()> {
    if let Some(other) = existing.iter().find(|p| p.overlaps(start_date, end_date)) {
        return Err(reject(format!(
            "Period {} to {} overlaps existing period '{}' ({} to {})",
            start_date, end_date, other.name, other.start_date, other.end_date
        )));
    }
    Ok(())
}

/// The period may move to `next` from its current status.
pub fn ensure_period_transition(period: &PayrollPeriod, next: PeriodStatus) -> EngineResult<()> {
    if !period.status.can_transition_to(next) {
        return Err(reject(format!(
            "Payroll period {} cannot move from {:?} to {:?}",
            period.id, period.status, next
        )));
    }
    Ok(())
}

/// There must be at least one active employee to calculate.
pub fn ensure_has_active_employees(employees: &[Employee]) -> EngineResult<()> {
    if employees.is_empty() {
        return Err(reject("No active employees to calculate".to_string()));
    }
    Ok(())
}

/// Every entry of the period must be CALCULATED before approval.
pub fn ensure_all_entries_calculated(entries: &[PayrollEntry]) -> EngineResult<()> {
    if entries.is_empty() {
        return Err(reject("Payroll period has no entries to approve".to_string()));
    }
    let pending = entries
        .iter()
        .filter(|e| e.status != EntryStatus::Calculated)
        .count();
    if pending > 0 {
        return Err(reject(format!(
            "{} payroll entr{} not in CALCULATED status",
            pending,
            if pending == 1 { "y is" } else { "ies are" }
        )));
    }
    Ok(())
}

/// Every entry must carry a generated CUNE before the period is marked sent.
pub fn ensure_all_entries_documented(entries: &[PayrollEntry]) -> EngineResult<()> {
    let missing = entries.iter().filter(|e| e.cune.is_none()).count();
    if missing > 0 {
        return Err(reject(format!(
            "{} payroll entr{} no generated document",
            missing,
            if missing == 1 { "y has" } else { "ies have" }
        )));
    }
    Ok(())
}

/// Entry inputs must be non-negative and within a month's bounds.
pub fn validate_entry_inputs(inputs: &EntryInputs) -> EngineResult<()> {
    let days = [
        ("days_worked", inputs.days_worked),
        ("incapacity_days", inputs.incapacity_days),
        ("leave_days", inputs.leave_days),
        ("vacation_days", inputs.vacation_days),
    ];
    if let Some((field, value)) = days.iter().find(|(_, v)| *v > DAYS_PER_MONTH) {
        return Err(reject(format!(
            "{} must be at most {}, got {}",
            field, DAYS_PER_MONTH, value
        )));
    }

    let max_hours = Decimal::from(MAX_OVERTIME_HOURS);
    for detail in &inputs.overtime {
        if detail.hours.is_sign_negative() || detail.hours > max_hours {
            return Err(reject(format!(
                "Overtime hours for {} must be between 0 and {}, got {}",
                detail.overtime_type.code(),
                MAX_OVERTIME_HOURS,
                detail.hours
            )));
        }
    }

    let max_amount = Decimal::from(MAX_INPUT_AMOUNT);
    let amounts = [
        ("bonuses", inputs.bonuses),
        ("commissions", inputs.commissions),
        ("per_diem", inputs.per_diem),
        ("other_earnings", inputs.other_earnings),
        ("union_dues", inputs.union_dues),
        ("loans", inputs.loans),
        ("other_deductions", inputs.other_deductions),
    ];
    if let Some((field, value)) = amounts
        .iter()
        .find(|(_, v)| v.is_sign_negative() || *v > max_amount)
    {
        return Err(reject(format!(
            "{} must be between 0 and {}, got {}",
            field, MAX_INPUT_AMOUNT, value
        )));
    }
    Ok(())
}

/// Manual edits are only allowed while DRAFT or CALCULATED.
pub fn ensure_entry_editable(entry: &PayrollEntry) -> EngineResult<()> {
    if !entry.status.is_editable() {
        return Err(reject(format!(
            "Payroll entry {} is {:?} and can no longer be edited",
            entry.id, entry.status
        )));
    }
    Ok(())
}

/// Documents are only generated for APPROVED entries.
pub fn ensure_entry_approved(entry: &PayrollEntry) -> EngineResult<()> {
    if entry.status != EntryStatus::Approved {
        return Err(reject(format!(
            "Payroll entry {} must be APPROVED to generate its document, found {:?}",
            entry.id, entry.status
        )));
    }
    Ok(())
}

/// Documents for a period are only generated once it is APPROVED.
pub fn ensure_period_approved(period: &PayrollPeriod) -> EngineResult<()> {
    if period.status != PeriodStatus::Approved {
        return Err(reject(format!(
            "Payroll period {} must be APPROVED to generate documents, found {:?}",
            period.id, period.status
        )));
    }
    Ok(())
}

/// An employee with unresolved payroll entries cannot be terminated.
pub fn ensure_no_open_entries(employee_id: Uuid, has_open_entries: bool) -> EngineResult<()> {
    if has_open_entries {
        return Err(reject(format!(
            "Employee {} has open payroll entries; approve or close them before terminating",
            employee_id
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::{OvertimeDetail, OvertimeType};
    use crate::test_support::{sample_entry, sample_period};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_period_range() {
        assert!(validate_period_range(d(2025, 1, 1), d(2025, 1, 31)).is_ok());
        assert_eq!(
            validate_period_range(d(2025, 1, 31), d(2025, 1, 31)).unwrap_err().kind(),
            ErrorKind::BadRequest
        );
    }

    #[test]
    fn test_overlap() {
        let existing = vec![sample_period(Uuid::new_v4(), d(2025, 1, 1), d(2025, 1, 31))];
        assert!(ensure_no_overlap(&existing, d(2025, 2, 1), d(2025, 2, 28)).is_ok());
        assert!(ensure_no_overlap(&existing, d(2025, 1, 31), d(2025, 2, 15)).is_err());
    }

    #[test]
    fn test_approval_requires_all_calculated() {
        let tenant = Uuid::new_v4();
        let period = Uuid::new_v4();
        let mut entries = vec![
            sample_entry(tenant, period, Uuid::new_v4(), 1),
            sample_entry(tenant, period, Uuid::new_v4(), 2),
        ];
        assert!(ensure_all_entries_calculated(&entries).is_ok());
        entries[1].status = EntryStatus::Draft;
        let err = ensure_all_entries_calculated(&entries).unwrap_err();
        assert!(err.to_string().contains("1 payroll entry is not"));
        assert!(ensure_all_entries_calculated(&[]).is_err());
    }

    #[test]
    fn test_entry_editability() {
        let mut entry = sample_entry(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), 1);
        assert!(ensure_entry_editable(&entry).is_ok());
        assert!(ensure_entry_approved(&entry).is_err());
        entry.status = EntryStatus::Approved;
        assert!(ensure_entry_editable(&entry).is_err());
        assert!(ensure_entry_approved(&entry).is_ok());
    }

    #[test]
    fn test_documented_entries() {
        let mut entry = sample_entry(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), 1);
        assert!(ensure_all_entries_documented(std::slice::from_ref(&entry)).is_err());
        entry.cune = Some("abc".to_string());
        assert!(ensure_all_entries_documented(&[entry]).is_ok());
    }

    #[test]
    fn test_entry_inputs_bounds() {
        let mut inputs = EntryInputs::for_days(30);
        inputs.bonuses = Decimal::from(250_000);
        inputs.overtime = vec![OvertimeDetail {
            overtime_type: OvertimeType::Night,
            hours: Decimal::from(MAX_OVERTIME_HOURS),
        }];
        assert!(validate_entry_inputs(&inputs).is_ok());

        let mut negative = inputs.clone();
        negative.bonuses = Decimal::from(-500_000);
        let err = validate_entry_inputs(&negative).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert!(err.to_string().contains("bonuses"));

        let mut negative_loans = inputs.clone();
        negative_loans.loans = Decimal::from(-1);
        assert!(validate_entry_inputs(&negative_loans).is_err());

        let mut too_many_days = inputs.clone();
        too_many_days.days_worked = 31;
        assert!(validate_entry_inputs(&too_many_days).is_err());

        let mut negative_hours = inputs.clone();
        negative_hours.overtime[0].hours = Decimal::from(-2);
        assert!(validate_entry_inputs(&negative_hours).is_err());

        let mut huge_hours = inputs.clone();
        huge_hours.overtime[0].hours = Decimal::from_i128_with_scale(10_i128.pow(25), 0);
        assert!(validate_entry_inputs(&huge_hours).is_err());

        let mut huge_amount = inputs;
        huge_amount.commissions = Decimal::from(MAX_INPUT_AMOUNT) + Decimal::ONE;
        assert!(validate_entry_inputs(&huge_amount).is_err());
    }

    #[test]
    fn test_terminate_guard() {
        let id = Uuid::new_v4();
        assert!(ensure_no_open_entries(id, false).is_ok());
        assert_eq!(
            ensure_no_open_entries(id, true).unwrap_err().kind(),
            ErrorKind::BadRequest
        );
    }
}
