//! Facade composing the payroll commands over one set of repositories.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::benefits::BenefitsEngine;
use crate::dian::DianSubmissionPreparer;
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, EmployeeStatus};
use crate::store::{
    ConfigStore, EmployeeReader, EmployeeWriter, MemoryStore, PayrollStore, TenantReader,
};

use super::context::TenantContext;
use super::entry::EntryOrchestrator;
use super::period::PeriodOrchestrator;

/// Every payroll command a transport adapter can expose.
#[derive(Clone)]
pub struct PayrollService {
    /// Period lifecycle.
    pub periods: PeriodOrchestrator,
    /// Entry edits.
    pub entries: EntryOrchestrator,
    /// Benefit disbursements and liquidation.
    pub benefits: BenefitsEngine,
    /// Document generation.
    pub documents: DianSubmissionPreparer,
    tenants: Arc<dyn TenantReader>,
    employee_reader: Arc<dyn EmployeeReader>,
    employee_writer: Arc<dyn EmployeeWriter>,
}

impl PayrollService {
    /// Wires every component to the given repositories.
    pub fn new(
        tenants: Arc<dyn TenantReader>,
        employee_reader: Arc<dyn EmployeeReader>,
        employee_writer: Arc<dyn EmployeeWriter>,
        configs: Arc<dyn ConfigStore>,
        payroll: Arc<dyn PayrollStore>,
    ) -> Self {
        Self {
            periods: PeriodOrchestrator::new(
                employee_reader.clone(),
                configs.clone(),
                payroll.clone(),
            ),
            entries: EntryOrchestrator::new(
                employee_reader.clone(),
                configs.clone(),
                payroll.clone(),
            ),
            benefits: BenefitsEngine::new(
                employee_reader.clone(),
                configs.clone(),
                payroll.clone(),
            ),
            documents: DianSubmissionPreparer::new(employee_reader.clone(), configs, payroll),
            tenants,
            employee_reader,
            employee_writer,
        }
    }

    /// Wires every component to one in-memory store.
    pub fn from_store(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store,
        )
    }

    /// Resolves the context a command runs in.
    pub async fn resolve_tenant(&self, tenant_id: Uuid) -> EngineResult<TenantContext> {
        TenantContext::resolve(self.tenants.as_ref(), tenant_id).await
    }

    /// Ends an employee's contract once no entry of theirs is still open.
    pub async fn terminate_employee(
        &self,
        ctx: &TenantContext,
        employee_id: Uuid,
        end_date: NaiveDate,
    ) -> EngineResult<Employee> {
        let mut employee = self
            .employee_reader
            .find_employee(ctx.tenant_id, employee_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Employee", employee_id))?;
        self.entries
            .ensure_employee_can_terminate(ctx, employee_id)
            .await?;
        if end_date < employee.start_date {
            return Err(EngineError::bad_request(format!(
                "Termination date {} precedes hire date {}",
                end_date, employee.start_date
            )));
        }

        employee.status = EmployeeStatus::Terminated;
        employee.end_date = Some(end_date);
        self.employee_writer
            .update_employee(ctx.tenant_id, employee.clone())
            .await?;

        info!(
            tenant_id = %ctx.tenant_id,
            employee_id = %employee_id,
            end_date = %end_date,
            "Employee terminated"
        );
        Ok(employee)
    }
}
