//! Payroll entry model: one employee's payroll within one period.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PayrollBreakdown;

/// Lifecycle status of a payroll entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    /// Created but never calculated.
    Draft,
    /// Calculated; still editable.
    Calculated,
    /// Approved with its period; frozen.
    Approved,
    /// Closed with its period; frozen.
    Closed,
}

impl EntryStatus {
    /// Returns true while manual edits and recalculation are allowed.
    pub fn is_editable(self) -> bool {
        matches!(self, EntryStatus::Draft | EntryStatus::Calculated)
    }

    /// Returns true once the entry's figures count as posted.
    pub fn is_posted(self) -> bool {
        matches!(self, EntryStatus::Approved | EntryStatus::Closed)
    }
}

/// The kind of payroll document an entry produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Individual payroll document (code 102).
    Individual,
    /// Adjustment note on a previously issued document (code 103).
    Adjustment,
}

impl DocumentType {
    /// The authority's document-type code.
    pub fn code(self) -> &'static str {
        match self {
            DocumentType::Individual => "102",
            DocumentType::Adjustment => "103",
        }
    }
}

/// The kind of overtime worked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OvertimeType {
    /// Daytime overtime (+25%).
    Day,
    /// Night overtime (+75%).
    Night,
    /// Sunday/holiday daytime overtime (+100%).
    HolidayDay,
    /// Sunday/holiday night overtime (+150%).
    HolidayNight,
    /// Special Sunday/holiday daytime overtime (+150%).
    HolidayDaySpecial,
    /// Special Sunday/holiday night overtime (+175%).
    HolidayNightSpecial,
}

impl OvertimeType {
    /// All overtime types in document order.
    pub const ALL: [OvertimeType; 6] = [
        OvertimeType::Day,
        OvertimeType::Night,
        OvertimeType::HolidayDay,
        OvertimeType::HolidayNight,
        OvertimeType::HolidayDaySpecial,
        OvertimeType::HolidayNightSpecial,
    ];

    /// Surcharge over the ordinary hourly rate, in percent.
    pub fn surcharge_percent(self) -> Decimal {
        match self {
            OvertimeType::Day => Decimal::from(25),
            OvertimeType::Night => Decimal::from(75),
            OvertimeType::HolidayDay => Decimal::from(100),
            OvertimeType::HolidayNight => Decimal::from(150),
            OvertimeType::HolidayDaySpecial => Decimal::from(150),
            OvertimeType::HolidayNightSpecial => Decimal::from(175),
        }
    }

    /// Multiplier applied to the hourly rate (1 + surcharge).
    pub fn multiplier(self) -> Decimal {
        Decimal::ONE + self.surcharge_percent() / Decimal::ONE_HUNDRED
    }

    /// The authority's element code for this overtime kind.
    pub fn code(self) -> &'static str {
        match self {
            OvertimeType::Day => "HED",
            OvertimeType::Night => "HEN",
            OvertimeType::HolidayDay => "HEDDF",
            OvertimeType::HolidayNight => "HENDF",
            OvertimeType::HolidayDaySpecial => "HRDDF",
            OvertimeType::HolidayNightSpecial => "HRNDF",
        }
    }
}

/// Overtime hours of one kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeDetail {
    /// The kind of overtime.
    pub overtime_type: OvertimeType,
    /// Hours worked.
    pub hours: Decimal,
}

/// The user-editable inputs of an entry.
///
/// Preserved across recalculation so manual edits survive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryInputs {
    /// Days paid in the period.
    pub days_worked: u32,
    /// Overtime details.
    #[serde(default)]
    pub overtime: Vec<OvertimeDetail>,
    /// Bonuses.
    #[serde(default)]
    pub bonuses: Decimal,
    /// Commissions.
    #[serde(default)]
    pub commissions: Decimal,
    /// Per-diem (viáticos).
    #[serde(default)]
    pub per_diem: Decimal,
    /// Incapacity days.
    #[serde(default)]
    pub incapacity_days: u32,
    /// Paid leave days.
    #[serde(default)]
    pub leave_days: u32,
    /// Vacation days taken and paid.
    #[serde(default)]
    pub vacation_days: u32,
    /// Other earnings.
    #[serde(default)]
    pub other_earnings: Decimal,
    /// Union dues.
    #[serde(default)]
    pub union_dues: Decimal,
    /// Payroll-deduction loans.
    #[serde(default)]
    pub loans: Decimal,
    /// Other deductions.
    #[serde(default)]
    pub other_deductions: Decimal,
}

impl EntryInputs {
    /// Inputs for a plain period with no novelties.
    pub fn for_days(days_worked: u32) -> Self {
        Self {
            days_worked,
            ..Default::default()
        }
    }
}

/// A partial edit of an entry's inputs. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryUpdate {
    /// New days worked.
    #[serde(default)]
    pub days_worked: Option<u32>,
    /// Replacement overtime list.
    #[serde(default)]
    pub overtime: Option<Vec<OvertimeDetail>>,
    /// New bonuses.
    #[serde(default)]
    pub bonuses: Option<Decimal>,
    /// New commissions.
    #[serde(default)]
    pub commissions: Option<Decimal>,
    /// New per-diem.
    #[serde(default)]
    pub per_diem: Option<Decimal>,
    /// New incapacity days.
    #[serde(default)]
    pub incapacity_days: Option<u32>,
    /// New leave days.
    #[serde(default)]
    pub leave_days: Option<u32>,
    /// New vacation days.
    #[serde(default)]
    pub vacation_days: Option<u32>,
    /// New other earnings.
    #[serde(default)]
    pub other_earnings: Option<Decimal>,
    /// New union dues.
    #[serde(default)]
    pub union_dues: Option<Decimal>,
    /// New loans.
    #[serde(default)]
    pub loans: Option<Decimal>,
    /// New other deductions.
    #[serde(default)]
    pub other_deductions: Option<Decimal>,
}

impl EntryUpdate {
    /// Merges this update into existing inputs.
    pub fn apply_to(&self, inputs: &mut EntryInputs) {
        if let Some(days) = self.days_worked {
            inputs.days_worked = days;
        }
        if let Some(overtime) = &self.overtime {
            inputs.overtime = overtime.clone();
        }
        let money = [
            (self.bonuses, &mut inputs.bonuses),
            (self.commissions, &mut inputs.commissions),
            (self.per_diem, &mut inputs.per_diem),
            (self.other_earnings, &mut inputs.other_earnings),
            (self.union_dues, &mut inputs.union_dues),
            (self.loans, &mut inputs.loans),
            (self.other_deductions, &mut inputs.other_deductions),
        ];
        for (value, target) in money {
            if let Some(value) = value {
                *target = value;
            }
        }
        let days = [
            (self.incapacity_days, &mut inputs.incapacity_days),
            (self.leave_days, &mut inputs.leave_days),
            (self.vacation_days, &mut inputs.vacation_days),
        ];
        for (value, target) in days {
            if let Some(value) = value {
                *target = value;
            }
        }
    }
}

/// Adjustment note kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentNoteType {
    /// Replaces the predecessor document (code 1).
    Replace,
    /// Voids the predecessor document (code 2).
    Delete,
}

impl AdjustmentNoteType {
    /// The authority's note-type code.
    pub fn code(self) -> &'static str {
        match self {
            AdjustmentNoteType::Replace => "1",
            AdjustmentNoteType::Delete => "2",
        }
    }
}

/// Reference to the document an adjustment note corrects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentReference {
    /// Kind of adjustment.
    pub note_type: AdjustmentNoteType,
    /// Document number of the predecessor.
    pub predecessor_number: String,
    /// CUNE of the predecessor.
    pub predecessor_cune: String,
    /// Generation date of the predecessor.
    pub predecessor_date: NaiveDate,
}

/// One employee's payroll within one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollEntry {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Owning period.
    pub period_id: Uuid,
    /// The employee paid.
    pub employee_id: Uuid,
    /// Tenant-unique sequential number, assigned once.
    pub entry_number: u64,
    /// Document kind this entry produces.
    pub document_type: DocumentType,
    /// Lifecycle status.
    pub status: EntryStatus,
    /// User-editable inputs.
    pub inputs: EntryInputs,
    /// Calculated figures.
    pub breakdown: PayrollBreakdown,
    /// Predecessor reference for adjustment notes.
    #[serde(default)]
    pub adjustment: Option<AdjustmentReference>,
    /// Generated document identifier.
    #[serde(default)]
    pub cune: Option<String>,
    /// Generated XML document.
    #[serde(default)]
    pub xml_document: Option<String>,
    /// When the document was generated (UTC-5).
    #[serde(default)]
    pub document_generated_at: Option<DateTime<FixedOffset>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl PayrollEntry {
    /// Formats the entry's document number, e.g. `NOM-000001`.
    pub fn document_number(&self, prefix: &str) -> String {
        format_document_number(prefix, self.entry_number)
    }
}

/// Formats a document number from a prefix and a sequence number.
///
/// ```
/// use nomina_engine::models::format_document_number;
///
/// assert_eq!(format_document_number("NOM", 1), "NOM-000001");
/// assert_eq!(format_document_number("NAJ", 1234567), "NAJ-1234567");
/// ```
pub fn format_document_number(prefix: &str, number: u64) -> String {
    format!("{}-{:06}", prefix, number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_entry_status_editability() {
        assert!(EntryStatus::Draft.is_editable());
        assert!(EntryStatus::Calculated.is_editable());
        assert!(!EntryStatus::Approved.is_editable());
        assert!(!EntryStatus::Closed.is_editable());
        assert!(EntryStatus::Closed.is_posted());
        assert!(!EntryStatus::Calculated.is_posted());
    }

    #[test]
    fn test_overtime_multipliers() {
        assert_eq!(OvertimeType::Day.multiplier(), dec("1.25"));
        assert_eq!(OvertimeType::Night.multiplier(), dec("1.75"));
        assert_eq!(OvertimeType::HolidayDay.multiplier(), dec("2"));
        assert_eq!(OvertimeType::HolidayNight.multiplier(), dec("2.5"));
        assert_eq!(OvertimeType::HolidayDaySpecial.multiplier(), dec("2.5"));
        assert_eq!(OvertimeType::HolidayNightSpecial.multiplier(), dec("2.75"));
    }

    #[test]
    fn test_update_merges_only_present_fields() {
        let mut inputs = EntryInputs {
            days_worked: 30,
            bonuses: dec("100000"),
            union_dues: dec("5000"),
            ..Default::default()
        };
        let update = EntryUpdate {
            days_worked: Some(15),
            commissions: Some(dec("250000")),
            overtime: Some(vec![OvertimeDetail {
                overtime_type: OvertimeType::Night,
                hours: dec("3"),
            }]),
            ..Default::default()
        };

        update.apply_to(&mut inputs);

        assert_eq!(inputs.days_worked, 15);
        assert_eq!(inputs.bonuses, dec("100000"));
        assert_eq!(inputs.commissions, dec("250000"));
        assert_eq!(inputs.union_dues, dec("5000"));
        assert_eq!(inputs.overtime.len(), 1);
    }

    #[test]
    fn test_document_codes() {
        assert_eq!(DocumentType::Individual.code(), "102");
        assert_eq!(DocumentType::Adjustment.code(), "103");
        assert_eq!(AdjustmentNoteType::Delete.code(), "2");
    }

    #[test]
    fn test_deserialize_update_from_partial_json() {
        let update: EntryUpdate =
            serde_json::from_str(r#"{"days_worked": 20, "bonuses": "50000"}"#).unwrap();
        assert_eq!(update.days_worked, Some(20));
        assert_eq!(update.bonuses, Some(dec("50000")));
        assert!(update.overtime.is_none());
    }
}
