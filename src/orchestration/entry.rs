//! Manual edits of single payroll entries.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::calculation::{CalculationInput, calculate_payroll};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AdjustmentReference, DocumentType, Employee, EntryStatus, EntryUpdate, PayrollEntry,
};
use crate::store::{ConfigStore, EmployeeReader, PayrollStore, UnitOfWork};

use super::context::TenantContext;
use super::guards::{ensure_entry_editable, ensure_no_open_entries, validate_entry_inputs};
use super::period::{aggregate_totals, find_period_in, finish};

async fn find_entry_in(uow: &mut dyn UnitOfWork, entry_id: Uuid) -> EngineResult<PayrollEntry> {
    uow.find_entry(entry_id)
        .await?
        .ok_or_else(|| EngineError::not_found("Payroll entry", entry_id))
}

/// Edits entry inputs and keeps the owning period's totals consistent.
#[derive(Clone)]
pub struct EntryOrchestrator {
    employees: Arc<dyn EmployeeReader>,
    configs: Arc<dyn ConfigStore>,
    payroll: Arc<dyn PayrollStore>,
}

impl EntryOrchestrator {
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

    /// Finds one entry.
    pub async fn get_entry(&self, ctx: &TenantContext, entry_id: Uuid) -> EngineResult<PayrollEntry> {
        self.payroll
            .find_entry(ctx.tenant_id, entry_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Payroll entry", entry_id))
    }

    async fn load_employee(&self, ctx: &TenantContext, employee_id: Uuid) -> EngineResult<Employee> {
        self.employees
            .find_employee(ctx.tenant_id, employee_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Employee", employee_id))
    }

    /// Merges `update` into the entry's inputs and recalculates it.
    ///
    /// Only DRAFT or CALCULATED entries can be edited. The entry ends up
    /// CALCULATED and the period totals are refreshed in the same unit of
    /// work.
    pub async fn update_entry(
        &self,
        ctx: &TenantContext,
        entry_id: Uuid,
        update: EntryUpdate,
    ) -> EngineResult<PayrollEntry> {
        let current = self.get_entry(ctx, entry_id).await?;
        ensure_entry_editable(&current)?;
        let employee = self.load_employee(ctx, current.employee_id).await?;
        let config = ctx.require_config(self.configs.as_ref()).await?;

        let mut uow = self.payroll.begin(ctx.tenant_id).await?;
        let result = async {
            // Re-read under the tenant lock; the period may have been approved meanwhile.
            let mut entry = find_entry_in(uow.as_mut(), entry_id).await?;
            ensure_entry_editable(&entry)?;

            update.apply_to(&mut entry.inputs);
            validate_entry_inputs(&entry.inputs)?;
            entry.breakdown = calculate_payroll(&CalculationInput::from_employee(
                &employee,
                &config.constants,
                &entry.inputs,
            ));
            entry.status = EntryStatus::Calculated;
            entry.updated_at = Utc::now();
            uow.upsert_entry(entry.clone()).await?;

            let mut period = find_period_in(uow.as_mut(), entry.period_id).await?;
            let entries = uow.list_entries(entry.period_id).await?;
            period.totals = aggregate_totals(&entries);
            period.updated_at = entry.updated_at;
            uow.update_period(period).await?;
            Ok::<_, EngineError>(entry)
        }
        .await;
        let entry = finish(uow, result).await?;

        info!(
            tenant_id = %ctx.tenant_id,
            entry_id = %entry.id,
            period_id = %entry.period_id,
            net_pay = %entry.breakdown.net_pay,
            "Payroll entry updated"
        );
        Ok(entry)
    }

    /// Turns an editable entry into an adjustment note on a prior document.
    pub async fn mark_as_adjustment(
        &self,
        ctx: &TenantContext,
        entry_id: Uuid,
        reference: AdjustmentReference,
    ) -> EngineResult<PayrollEntry> {
        if reference.predecessor_number.trim().is_empty()
            || reference.predecessor_cune.trim().is_empty()
        {
            return Err(EngineError::bad_request(
                "Adjustment reference needs the predecessor document number and CUNE",
            ));
        }

        let mut uow = self.payroll.begin(ctx.tenant_id).await?;
        let result = async {
            let mut entry = find_entry_in(uow.as_mut(), entry_id).await?;
            ensure_entry_editable(&entry)?;
            entry.document_type = DocumentType::Adjustment;
            entry.adjustment = Some(reference);
            entry.updated_at = Utc::now();
            uow.upsert_entry(entry.clone()).await?;
            Ok::<_, EngineError>(entry)
        }
        .await;
        let entry = finish(uow, result).await?;

        info!(
            tenant_id = %ctx.tenant_id,
            entry_id = %entry.id,
            "Payroll entry marked as adjustment note"
        );
        Ok(entry)
    }

    /// Rejects termination while the employee has DRAFT or CALCULATED entries.
    pub async fn ensure_employee_can_terminate(
        &self,
        ctx: &TenantContext,
        employee_id: Uuid,
    ) -> EngineResult<()> {
        let open = self
            .payroll
            .has_open_entries(ctx.tenant_id, employee_id)
            .await?;
        ensure_no_open_entries(employee_id, open)
    }
}
