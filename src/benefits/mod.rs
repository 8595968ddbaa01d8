//! Statutory benefits: provisions, disbursements and liquidation.
//!
//! The monthly provision formulas are shared with the calculation engine.
//! Disbursements and the liquidation preview use the 360-day convention
//! over their own accrual windows and are computed on demand; nothing here
//! is persisted.

mod day_count;
mod liquidation;
mod payment;
mod provisions;

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{BenefitPaymentResult, BenefitType, Employee, LiquidationPreview};
use crate::orchestration::TenantContext;
use crate::store::{ConfigStore, EmployeeReader, PayrollStore};

pub use day_count::{
    AccrualWindow, DAYS_PER_YEAR, days360, liquidation_window, payment_window, semester_start,
    year_start,
};
pub use liquidation::build_liquidation_preview;
pub use payment::{
    BenefitAmount, SEVERANCE_INTEREST_RATE, VACATION_DAYS_DIVISOR, allowance_for,
    calculate_benefit_amount, compute_benefit_payment, ensure_benefit_eligible,
};
pub use provisions::{
    MONTHLY_ACCRUAL_RATE, ProvisionsResult, SEVERANCE_INTEREST_MONTHLY_RATE, VACATION_DIVISOR,
    calculate_monthly_provisions,
};

/// Computes benefit disbursements and liquidation previews for a tenant.
#[derive(Clone)]
pub struct BenefitsEngine {
    employees: Arc<dyn EmployeeReader>,
    configs: Arc<dyn ConfigStore>,
    payroll: Arc<dyn PayrollStore>,
}

impl BenefitsEngine {
    /// Creates a benefits engine over the given repositories.
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

    async fn load_employee(&self, ctx: &TenantContext, employee_id: Uuid) -> EngineResult<Employee> {
        self.employees
            .find_employee(ctx.tenant_id, employee_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Employee", employee_id))
    }

    /// Computes one benefit disbursement as of `payment_date`.
    pub async fn calculate_benefit_payment(
        &self,
        ctx: &TenantContext,
        employee_id: Uuid,
        benefit: BenefitType,
        payment_date: NaiveDate,
    ) -> EngineResult<BenefitPaymentResult> {
        let employee = self.load_employee(ctx, employee_id).await?;
        let config = ctx.require_config(self.configs.as_ref()).await?;

        let result = compute_benefit_payment(&employee, &config.constants, benefit, payment_date)?;
        info!(
            tenant_id = %ctx.tenant_id,
            employee_id = %employee_id,
            benefit = ?benefit,
            days = result.days,
            amount = %result.amount,
            "Benefit payment calculated"
        );
        Ok(result)
    }

    /// Builds the termination liquidation preview.
    ///
    /// The termination date defaults to today (UTC).
    pub async fn liquidation_preview(
        &self,
        ctx: &TenantContext,
        employee_id: Uuid,
        termination_date: Option<NaiveDate>,
    ) -> EngineResult<LiquidationPreview> {
        let employee = self.load_employee(ctx, employee_id).await?;
        ensure_benefit_eligible(&employee)?;
        let config = ctx.require_config(self.configs.as_ref()).await?;
        let termination_date = termination_date.unwrap_or_else(|| Utc::now().date_naive());

        let posted = self
            .payroll
            .sum_posted_provisions(ctx.tenant_id, employee_id)
            .await?;
        let preview =
            build_liquidation_preview(&employee, &config.constants, termination_date, posted)?;

        info!(
            tenant_id = %ctx.tenant_id,
            employee_id = %employee_id,
            termination_date = %termination_date,
            total_benefits = %preview.total_benefits,
            net_payable = %preview.net_payable,
            "Liquidation preview built"
        );
        Ok(preview)
    }
}
