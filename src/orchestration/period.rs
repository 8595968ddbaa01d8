//! Payroll period lifecycle.
//!
//! OPEN → CALCULATED → APPROVED → (SENT_TO_DIAN) → CLOSED, never backwards.
//! Every multi-row write runs inside one unit of work: either every entry
//! and the period totals change, or nothing does.

use std::sync::Arc;
use std::time::Instant;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculation::{CalculationInput, calculate_payroll};
use crate::config::PayrollConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    DocumentType, Employee, EntryInputs, EntryStatus, PayrollEntry, PayrollPeriod, PeriodStatus,
    PeriodTotals, PeriodType,
};
use crate::store::{ConfigStore, EmployeeReader, PayrollStore, UnitOfWork};

use super::context::TenantContext;
use super::guards::{
    ensure_all_entries_calculated, ensure_all_entries_documented, ensure_has_active_employees,
    ensure_no_overlap, ensure_period_transition, validate_period_range,
};

/// The data needed to open a new period.
#[derive(Debug, Clone)]
pub struct NewPeriod {
    /// Display name, e.g. "Nómina enero 2026".
    pub name: String,
    /// Recurrence.
    pub period_type: PeriodType,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day.
    pub end_date: NaiveDate,
    /// Payment date.
    pub payment_date: NaiveDate,
}

/// Sums the breakdowns of a period's entries.
pub fn aggregate_totals(entries: &[PayrollEntry]) -> PeriodTotals {
    entries.iter().fold(PeriodTotals::default(), |mut totals, e| {
        let b = &e.breakdown;
        totals.total_earned += b.earnings.total;
        totals.total_deductions += b.deductions.total;
        totals.total_net += b.net_pay;
        totals.total_employer_contributions += b.employer_contributions.total;
        totals.total_provisions += b.provisions.total();
        totals
    })
}

pub(crate) async fn find_period_in(
    uow: &mut dyn UnitOfWork,
    period_id: Uuid,
) -> EngineResult<PayrollPeriod> {
    uow.find_period(period_id)
        .await?
        .ok_or_else(|| EngineError::not_found("Payroll period", period_id))
}

/// Commits on success and rolls back on failure.
pub(crate) async fn finish<T>(
    uow: Box<dyn UnitOfWork>,
    result: EngineResult<T>,
) -> EngineResult<T> {
    match result {
        Ok(value) => {
            uow.commit().await?;
            Ok(value)
        }
        Err(err) => {
            uow.rollback().await?;
            Err(err)
        }
    }
}

/// Owns the period state machine.
#[derive(Clone)]
pub struct PeriodOrchestrator {
    employees: Arc<dyn EmployeeReader>,
    configs: Arc<dyn ConfigStore>,
    payroll: Arc<dyn PayrollStore>,
}

impl PeriodOrchestrator {
    /// Creates an orchestrator over the given repositories.
    pub fn new(
        employees: Arc<dyn EmployeeReader>,
        configs: Arc<dyn ConfigStore>,
        payroll: Arc<dyn PayrollStore>,
    ) -> Self {
        Self {
            employees,
            configs,
            payroll,
        }
    }

    /// Opens a new period after validating its date range.
    pub async fn create(&self, ctx: &TenantContext, new: NewPeriod) -> EngineResult<PayrollPeriod> {
        validate_period_range(new.start_date, new.end_date)?;

        let now = Utc::now();
        let period = PayrollPeriod {
            id: Uuid::new_v4(),
            tenant_id: ctx.tenant_id,
            name: new.name,
            period_type: new.period_type,
            start_date: new.start_date,
            end_date: new.end_date,
            payment_date: new.payment_date,
            status: PeriodStatus::Open,
            totals: PeriodTotals::default(),
            employee_count: 0,
            approved_by: None,
            approved_at: None,
            created_at: now,
            updated_at: now,
        };
        let mut uow = self.payroll.begin(ctx.tenant_id).await?;
        let result = async {
            let existing = uow.list_periods().await?;
            ensure_no_overlap(&existing, period.start_date, period.end_date)?;
            uow.insert_period(period.clone()).await?;
            Ok::<_, EngineError>(())
        }
        .await;
        finish(uow, result).await?;

        info!(
            tenant_id = %ctx.tenant_id,
            period_id = %period.id,
            start = %period.start_date,
            end = %period.end_date,
            "Payroll period created"
        );
        Ok(period)
    }

    /// Finds one period.
    pub async fn get(&self, ctx: &TenantContext, period_id: Uuid) -> EngineResult<PayrollPeriod> {
        self.payroll
            .find_period(ctx.tenant_id, period_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Payroll period", period_id))
    }

    /// Lists the tenant's periods, most recent first.
    pub async fn list(&self, ctx: &TenantContext) -> EngineResult<Vec<PayrollPeriod>> {
        self.payroll.list_periods(ctx.tenant_id).await
    }

    /// Lists the entries of a period.
    pub async fn list_entries(
        &self,
        ctx: &TenantContext,
        period_id: Uuid,
    ) -> EngineResult<Vec<PayrollEntry>> {
        self.get(ctx, period_id).await?;
        self.payroll.list_entries(ctx.tenant_id, period_id).await
    }

    /// Calculates every active employee's entry and the period totals.
    ///
    /// Re-entrant while the period is OPEN or CALCULATED. Existing entries
    /// keep their inputs and entry number; new entries default to the full
    /// period days and receive the next tenant-wide number.
    pub async fn calculate(
        &self,
        ctx: &TenantContext,
        period_id: Uuid,
    ) -> EngineResult<PayrollPeriod> {
        let start_time = Instant::now();
        let config = ctx.require_config(self.configs.as_ref()).await?;
        let employees = self.employees.list_active_employees(ctx.tenant_id).await?;

        let mut uow = self.payroll.begin(ctx.tenant_id).await?;
        let result = calculate_in(uow.as_mut(), ctx, period_id, &config, &employees).await;
        let period = finish(uow, result).await?;

        info!(
            tenant_id = %ctx.tenant_id,
            period_id = %period.id,
            employee_count = period.employee_count,
            total_earned = %period.totals.total_earned,
            total_net = %period.totals.total_net,
            duration_us = start_time.elapsed().as_micros() as u64,
            "Payroll period calculated"
        );
        Ok(period)
    }

    /// Approves a CALCULATED period whose entries are all CALCULATED.
    pub async fn approve(
        &self,
        ctx: &TenantContext,
        period_id: Uuid,
        approver_id: &str,
    ) -> EngineResult<PayrollPeriod> {
        let mut uow = self.payroll.begin(ctx.tenant_id).await?;
        let result = async {
            let mut period = find_period_in(uow.as_mut(), period_id).await?;
            ensure_period_transition(&period, PeriodStatus::Approved)?;
            let entries = uow.list_entries(period_id).await?;
            ensure_all_entries_calculated(&entries)?;

            let changed = uow
                .update_entry_statuses(period_id, EntryStatus::Approved)
                .await?;
            let now = Utc::now();
            period.status = PeriodStatus::Approved;
            period.approved_by = Some(approver_id.to_string());
            period.approved_at = Some(now);
            period.updated_at = now;
            uow.update_period(period.clone()).await?;
            Ok::<_, EngineError>((period, changed))
        }
        .await;
        let (period, changed) = finish(uow, result).await?;

        info!(
            tenant_id = %ctx.tenant_id,
            period_id = %period_id,
            approver = %approver_id,
            entries = changed,
            "Payroll period approved"
        );
        Ok(period)
    }

    /// Closes an APPROVED or SENT_TO_DIAN period and all its entries.
    pub async fn close(&self, ctx: &TenantContext, period_id: Uuid) -> EngineResult<PayrollPeriod> {
        let mut uow = self.payroll.begin(ctx.tenant_id).await?;
        let result = async {
            let mut period = find_period_in(uow.as_mut(), period_id).await?;
            ensure_period_transition(&period, PeriodStatus::Closed)?;
            uow.update_entry_statuses(period_id, EntryStatus::Closed)
                .await?;
            period.status = PeriodStatus::Closed;
            period.updated_at = Utc::now();
            uow.update_period(period.clone()).await?;
            Ok::<_, EngineError>(period)
        }
        .await;
        let period = finish(uow, result).await?;

        info!(tenant_id = %ctx.tenant_id, period_id = %period_id, "Payroll period closed");
        Ok(period)
    }

    /// Marks an APPROVED period as delivered once every entry has a document.
    pub async fn mark_sent(&self, ctx: &TenantContext, period_id: Uuid) -> EngineResult<PayrollPeriod> {
        let mut uow = self.payroll.begin(ctx.tenant_id).await?;
        let result = async {
            let mut period = find_period_in(uow.as_mut(), period_id).await?;
            ensure_period_transition(&period, PeriodStatus::SentToDian)?;
            let entries = uow.list_entries(period_id).await?;
            ensure_all_entries_documented(&entries)?;
            period.status = PeriodStatus::SentToDian;
            period.updated_at = Utc::now();
            uow.update_period(period.clone()).await?;
            Ok::<_, EngineError>(period)
        }
        .await;
        let period = finish(uow, result).await?;

        info!(tenant_id = %ctx.tenant_id, period_id = %period_id, "Payroll period marked as sent");
        Ok(period)
    }
}

async fn calculate_in(
    uow: &mut dyn UnitOfWork,
    ctx: &TenantContext,
    period_id: Uuid,
    config: &PayrollConfig,
    employees: &[Employee],
) -> EngineResult<PayrollPeriod> {
    let mut period = find_period_in(uow, period_id).await?;
    ensure_period_transition(&period, PeriodStatus::Calculated)?;
    ensure_has_active_employees(employees)?;

    let default_days = period.period_days();
    let now = Utc::now();

    for employee in employees {
        let existing = uow.find_entry_for_employee(period_id, employee.id).await?;
        let inputs = existing
            .as_ref()
            .map(|e| e.inputs.clone())
            .unwrap_or_else(|| EntryInputs::for_days(default_days));
        let breakdown = calculate_payroll(&CalculationInput::from_employee(
            employee,
            &config.constants,
            &inputs,
        ));

        let entry = match existing {
            Some(mut entry) => {
                entry.inputs = inputs;
                entry.breakdown = breakdown;
                entry.status = EntryStatus::Calculated;
                entry.updated_at = now;
                entry
            }
            None => PayrollEntry {
                id: Uuid::new_v4(),
                tenant_id: ctx.tenant_id,
                period_id,
                employee_id: employee.id,
                entry_number: uow.next_entry_number().await?,
                document_type: DocumentType::Individual,
                status: EntryStatus::Calculated,
                inputs,
                breakdown,
                adjustment: None,
                cune: None,
                xml_document: None,
                document_generated_at: None,
                created_at: now,
                updated_at: now,
            },
        };

        debug!(
            tenant_id = %ctx.tenant_id,
            period_id = %period_id,
            employee_id = %employee.id,
            entry_number = entry.entry_number,
            net_pay = %entry.breakdown.net_pay,
            "Entry calculated"
        );
        uow.upsert_entry(entry).await?;
    }

    let entries = uow.list_entries(period_id).await?;
    period.totals = aggregate_totals(&entries);
    period.employee_count = u32::try_from(employees.len()).unwrap_or(u32::MAX);
    period.status = PeriodStatus::Calculated;
    period.updated_at = now;
    uow.update_period(period.clone()).await?;

    if period.totals.total_net < Decimal::ZERO {
        warn!(period_id = %period_id, total_net = %period.totals.total_net, "Period net total is negative");
    }
    Ok(period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::{EntryUpdate, OvertimeDetail, OvertimeType, SalaryType};
    use crate::orchestration::EntryOrchestrator;
    use crate::store::{EmployeeWriter, MemoryStore};
    use crate::test_support::{sample_config, sample_employee};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    struct Fixture {
        store: MemoryStore,
        ctx: TenantContext,
        periods: PeriodOrchestrator,
        entries: EntryOrchestrator,
    }

    async fn fixture(employee_count: usize) -> Fixture {
        let store = MemoryStore::new();
        let ctx = TenantContext::new(Uuid::new_v4());
        store.register_tenant(ctx.tenant_id, None).await;
        store.save_config(ctx.tenant_id, sample_config()).await.unwrap();
        for i in 0..employee_count {
            let mut employee =
                sample_employee(Decimal::from(1_423_500), SalaryType::Ordinary, d(2024, 1, 1));
            employee.document_number = format!("10000000{}", i);
            store.insert_employee(ctx.tenant_id, employee).await.unwrap();
        }
        let shared = Arc::new(store.clone());
        Fixture {
            periods: PeriodOrchestrator::new(shared.clone(), shared.clone(), shared.clone()),
            entries: EntryOrchestrator::new(shared.clone(), shared.clone(), shared),
            store,
            ctx,
        }
    }

    fn january() -> NewPeriod {
        NewPeriod {
            name: "Nómina enero 2026".to_string(),
            period_type: PeriodType::Monthly,
            start_date: d(2026, 1, 1),
            end_date: d(2026, 1, 31),
            payment_date: d(2026, 1, 31),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_inverted_and_overlapping_ranges() {
        let f = fixture(1).await;
        let mut bad = january();
        bad.end_date = d(2025, 12, 1);
        assert_eq!(
            f.periods.create(&f.ctx, bad).await.unwrap_err().kind(),
            ErrorKind::BadRequest
        );

        f.periods.create(&f.ctx, january()).await.unwrap();
        let mut overlapping = january();
        overlapping.start_date = d(2026, 1, 16);
        overlapping.end_date = d(2026, 2, 15);
        assert_eq!(
            f.periods.create(&f.ctx, overlapping).await.unwrap_err().kind(),
            ErrorKind::BadRequest
        );
    }

    #[tokio::test]
    async fn test_concurrent_creates_of_same_range_admit_one() {
        let f = fixture(0).await;
        let (first, second) = tokio::join!(
            f.periods.create(&f.ctx, january()),
            f.periods.create(&f.ctx, january())
        );
        let outcomes = [first, second];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        let rejected = outcomes.iter().find_map(|r| r.as_ref().err()).unwrap();
        assert_eq!(rejected.kind(), ErrorKind::BadRequest);
        assert_eq!(f.periods.list(&f.ctx).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_calculate_creates_numbered_entries_and_totals() {
        let f = fixture(2).await;
        let period = f.periods.create(&f.ctx, january()).await.unwrap();
        let period = f.periods.calculate(&f.ctx, period.id).await.unwrap();

        assert_eq!(period.status, PeriodStatus::Calculated);
        assert_eq!(period.employee_count, 2);
        assert_eq!(period.totals.total_earned, Decimal::from(3_247_000));
        assert_eq!(period.totals.total_net, Decimal::from(3_019_240));

        let entries = f.periods.list_entries(&f.ctx, period.id).await.unwrap();
        let numbers: Vec<u64> = entries.iter().map(|e| e.entry_number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert!(entries.iter().all(|e| e.inputs.days_worked == 30));
    }

    #[tokio::test]
    async fn test_recalculate_preserves_inputs_and_numbers() {
        let f = fixture(1).await;
        let period = f.periods.create(&f.ctx, january()).await.unwrap();
        f.periods.calculate(&f.ctx, period.id).await.unwrap();
        let entry = f.periods.list_entries(&f.ctx, period.id).await.unwrap().remove(0);

        let update = EntryUpdate {
            bonuses: Some(Decimal::from(100_000)),
            overtime: Some(vec![OvertimeDetail {
                overtime_type: OvertimeType::Day,
                hours: Decimal::from(3),
            }]),
            ..Default::default()
        };
        f.entries.update_entry(&f.ctx, entry.id, update).await.unwrap();

        let period = f.periods.calculate(&f.ctx, period.id).await.unwrap();
        let recalculated = f.periods.list_entries(&f.ctx, period.id).await.unwrap().remove(0);
        assert_eq!(recalculated.id, entry.id);
        assert_eq!(recalculated.entry_number, entry.entry_number);
        assert_eq!(recalculated.inputs.bonuses, Decimal::from(100_000));
        assert_eq!(recalculated.breakdown.earnings.overtime_total, Decimal::from(22_242));
        assert_eq!(period.totals.total_earned, Decimal::from(1_745_742));
    }

    #[tokio::test]
    async fn test_calculate_without_employees_fails_and_leaves_period_open() {
        let f = fixture(0).await;
        let period = f.periods.create(&f.ctx, january()).await.unwrap();
        let err = f.periods.calculate(&f.ctx, period.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        let period = f.periods.get(&f.ctx, period.id).await.unwrap();
        assert_eq!(period.status, PeriodStatus::Open);
    }

    #[tokio::test]
    async fn test_calculate_unknown_period_is_not_found() {
        let f = fixture(1).await;
        let err = f.periods.calculate(&f.ctx, Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_approve_with_draft_entry_fails() {
        let f = fixture(2).await;
        let period = f.periods.create(&f.ctx, january()).await.unwrap();
        f.periods.calculate(&f.ctx, period.id).await.unwrap();

        let mut uow = f.store.begin(f.ctx.tenant_id).await.unwrap();
        let mut entry = uow.list_entries(period.id).await.unwrap().remove(0);
        entry.status = EntryStatus::Draft;
        uow.upsert_entry(entry).await.unwrap();
        uow.commit().await.unwrap();

        let err = f.periods.approve(&f.ctx, period.id, "admin").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        let entries = f.periods.list_entries(&f.ctx, period.id).await.unwrap();
        assert!(entries.iter().all(|e| e.status != EntryStatus::Approved));
    }

    #[tokio::test]
    async fn test_approve_then_close() {
        let f = fixture(2).await;
        let period = f.periods.create(&f.ctx, january()).await.unwrap();
        f.periods.calculate(&f.ctx, period.id).await.unwrap();

        let approved = f.periods.approve(&f.ctx, period.id, "admin").await.unwrap();
        assert_eq!(approved.status, PeriodStatus::Approved);
        assert_eq!(approved.approved_by.as_deref(), Some("admin"));
        assert!(approved.approved_at.is_some());
        let entries = f.periods.list_entries(&f.ctx, period.id).await.unwrap();
        assert!(entries.iter().all(|e| e.status == EntryStatus::Approved));

        // Approved periods can no longer be recalculated
        assert_eq!(
            f.periods.calculate(&f.ctx, period.id).await.unwrap_err().kind(),
            ErrorKind::BadRequest
        );

        let closed = f.periods.close(&f.ctx, period.id).await.unwrap();
        assert_eq!(closed.status, PeriodStatus::Closed);
        let entries = f.periods.list_entries(&f.ctx, period.id).await.unwrap();
        assert!(entries.iter().all(|e| e.status == EntryStatus::Closed));
    }

    #[tokio::test]
    async fn test_close_open_period_fails() {
        let f = fixture(1).await;
        let period = f.periods.create(&f.ctx, january()).await.unwrap();
        assert_eq!(
            f.periods.close(&f.ctx, period.id).await.unwrap_err().kind(),
            ErrorKind::BadRequest
        );
    }

    #[tokio::test]
    async fn test_mark_sent_requires_documents() {
        let f = fixture(1).await;
        let period = f.periods.create(&f.ctx, january()).await.unwrap();
        f.periods.calculate(&f.ctx, period.id).await.unwrap();
        f.periods.approve(&f.ctx, period.id, "admin").await.unwrap();

        assert_eq!(
            f.periods.mark_sent(&f.ctx, period.id).await.unwrap_err().kind(),
            ErrorKind::BadRequest
        );

        let mut entry = f.periods.list_entries(&f.ctx, period.id).await.unwrap().remove(0);
        entry.cune = Some("0".repeat(96));
        let mut uow = f.store.begin(f.ctx.tenant_id).await.unwrap();
        uow.upsert_entry(entry).await.unwrap();
        uow.commit().await.unwrap();

        let sent = f.periods.mark_sent(&f.ctx, period.id).await.unwrap();
        assert_eq!(sent.status, PeriodStatus::SentToDian);
        let closed = f.periods.close(&f.ctx, period.id).await.unwrap();
        assert_eq!(closed.status, PeriodStatus::Closed);
    }

    #[tokio::test]
    async fn test_entry_numbers_continue_across_periods() {
        let f = fixture(1).await;
        let first = f.periods.create(&f.ctx, january()).await.unwrap();
        f.periods.calculate(&f.ctx, first.id).await.unwrap();
        let second = f
            .periods
            .create(
                &f.ctx,
                NewPeriod {
                    name: "Nómina febrero 2026".to_string(),
                    period_type: PeriodType::Monthly,
                    start_date: d(2026, 2, 1),
                    end_date: d(2026, 2, 28),
                    payment_date: d(2026, 2, 28),
                },
            )
            .await
            .unwrap();
        f.periods.calculate(&f.ctx, second.id).await.unwrap();

        let entry = f.periods.list_entries(&f.ctx, second.id).await.unwrap().remove(0);
        assert_eq!(entry.entry_number, 2);
        assert_eq!(entry.inputs.days_worked, 28);
    }
}
